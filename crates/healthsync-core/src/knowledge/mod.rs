//! Chat responders that sit behind the `/api/chat` endpoint.
//!
//! - [`responder`]: the `Responder` port
//! - [`base`]: the keyword knowledge base, the default responder

pub mod base;
pub mod responder;

pub use base::KnowledgeBase;
pub use responder::Responder;
