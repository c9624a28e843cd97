//! HTTP surface of the AI pipeline: streaming chat, single-shot course
//! generation and generation statistics.

mod config;
mod handlers;
mod router;
mod state;
mod types;

pub use config::HttpConfig;
pub use router::router;
pub use state::AppState;
pub use types::{ChatRequest, GenerateCourseRequest, StatsResponse};
