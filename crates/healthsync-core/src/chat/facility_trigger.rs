//! Asks the facility locator for a nearby search when a reply mentions care.
//!
//! The trigger owns the sending half of a channel handed in at construction.
//! Sending is best effort: a closed or full channel is logged and ignored.

use std::time::Duration;

use healthsync_types::facility::{FacilityFilter, FacilitySearchRequest};
use tokio::sync::mpsc;

/// Words in an assistant reply that suggest the user may need a facility.
pub const HEALTHCARE_KEYWORDS: &[&str] = &[
    "hospital",
    "urgent",
    "emergency",
    "severe",
    "clinic",
    "doctor",
    "medical",
    "treatment",
    "pharmacy",
    "prescription",
    "medicine",
    "care center",
    "healthcare",
    "facility",
    "professional medical",
    "seek",
    "visit",
    "nearby",
];

/// Case-insensitive keyword scan of a reply.
pub fn mentions_healthcare(text: &str) -> bool {
    let lower = text.to_lowercase();
    HEALTHCARE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

pub struct FacilityTrigger {
    sender: mpsc::Sender<FacilitySearchRequest>,
    delay: Duration,
    radius_m: u32,
}

impl FacilityTrigger {
    pub fn new(sender: mpsc::Sender<FacilitySearchRequest>, delay: Duration, radius_m: u32) -> Self {
        Self {
            sender,
            delay,
            radius_m,
        }
    }

    /// Schedule a search if `reply` mentions healthcare. Returns whether one
    /// was scheduled. The request is delivered after the configured delay.
    pub fn notify_if_relevant(&self, reply: &str) -> bool {
        if !mentions_healthcare(reply) {
            return false;
        }

        let sender = self.sender.clone();
        let delay = self.delay;
        let request = FacilitySearchRequest {
            filter: FacilityFilter::All,
            radius_m: self.radius_m,
        };

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = sender.try_send(request) {
                tracing::debug!("facility search request not delivered: {e}");
            }
        });
        true
    }
}
