//! Fixed keyword knowledge base.
//!
//! The last message of a request is lowercased and matched against an
//! ordered topic table; the first topic contained in it wins. Nothing
//! matching falls through to a general answer listing the known topics.

use std::future::Future;

use healthsync_types::error::ResponderError;
use healthsync_types::wire::{ChatCompletionRequest, ChatCompletionResponse};

use super::responder::Responder;

/// Topics in match order, paired with their canned answer.
const TOPICS: &[(&str, &str)] = &[
    (
        "headache",
        "For a headache, try: 1) Rest in a quiet, dark room 2) Stay hydrated by drinking water 3) Take over-the-counter pain relief (ibuprofen/acetaminophen) if needed 4) Apply a warm or cold compress to your head. Seek medical attention if it's severe or persistent.",
    ),
    (
        "fever",
        "For a fever, do: 1) Rest and get plenty of sleep 2) Drink plenty of fluids (water, tea, broth) 3) Use cool, damp cloths on your body 4) Take fever-reducing medication (acetaminophen/ibuprofen) as directed. Consult a doctor if fever exceeds 103°F or lasts more than 3 days.",
    ),
    (
        "cold",
        "For a cold: 1) Stay hydrated and rest 2) Use saline nasal drops or spray 3) Gargle with salt water for a sore throat 4) Consume vitamin C-rich foods (oranges, berries) 5) Use humidifier to ease congestion. Most colds resolve in 7-10 days.",
    ),
    (
        "cough",
        "For a cough: 1) Stay hydrated - drink water and warm tea with honey 2) Use cough drops or lozenges 3) Avoid irritants like smoke and dry air 4) Get adequate rest 5) Use a humidifier. See a doctor if cough persists beyond 3 weeks.",
    ),
    (
        "sore throat",
        "For a sore throat: 1) Gargle with warm salt water 2) Drink warm liquids (tea, broth, warm lemon water with honey) 3) Use throat lozenges 4) Rest your voice 5) Take pain reliever as needed. Seek care if symptoms worsen or include difficulty swallowing.",
    ),
    (
        "flu",
        "For flu symptoms: 1) Stay home and rest 2) Drink fluids to prevent dehydration 3) Take flu medication if prescribed within 48 hours of symptoms 4) Use fever reducers for aches/fever 5) Avoid contact with others. Seek immediate care if experiencing severe symptoms.",
    ),
    (
        "fatigue",
        "For fatigue: 1) Ensure 7-9 hours of sleep nightly 2) Stay physically active with light exercise 3) Eat balanced meals with protein, fruits, and vegetables 4) Stay hydrated 5) Manage stress. If persistent, consult a doctor as it may indicate an underlying condition.",
    ),
    (
        "anxiety",
        "For anxiety: 1) Practice deep breathing exercises 2) Try meditation or mindfulness apps 3) Limit caffeine intake 4) Exercise regularly - even a 20-minute walk helps 5) Get adequate sleep. Consider speaking with a mental health professional if anxiety interferes with daily life.",
    ),
];

/// Answer given when no topic matches.
pub const DEFAULT_ANSWER: &str = "I'm here to help! Please describe your symptoms in more detail. Common topics I can help with include: headache, fever, cold, cough, sore throat, flu, fatigue, and anxiety. Always consult a healthcare professional for serious or persistent symptoms.";

#[derive(Debug, Clone, Copy, Default)]
pub struct KnowledgeBase;

impl KnowledgeBase {
    pub fn new() -> Self {
        Self
    }

    /// Topic keywords in match order.
    pub fn topics(&self) -> impl Iterator<Item = &'static str> {
        TOPICS.iter().map(|(keyword, _)| *keyword)
    }

    /// Canned answer for `question`.
    pub fn answer(&self, question: &str) -> &'static str {
        let question = question.to_lowercase();
        TOPICS
            .iter()
            .find(|(keyword, _)| question.contains(keyword))
            .map_or(DEFAULT_ANSWER, |(_, answer)| answer)
    }
}

impl Responder for KnowledgeBase {
    fn name(&self) -> &str {
        "knowledge-base"
    }

    fn respond(
        &self,
        request: &ChatCompletionRequest,
    ) -> impl Future<Output = Result<ChatCompletionResponse, ResponderError>> + Send {
        let question = request.last_content();
        tracing::info!(question, "answering from knowledge base");
        let answer = self.answer(question);
        async move { Ok(ChatCompletionResponse::from_text(answer)) }
    }
}
