//! Test doubles and fixtures shared across courseforge crates.
//!
//! Production code must not depend on this crate; it exists for
//! dev-dependencies only.

mod fixtures;
mod mock_gateway;

pub use fixtures::{sample_course_args, seeded_catalog};
pub use mock_gateway::{MockGateway, text_reply, tool_call_reply};
