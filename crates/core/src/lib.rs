#![forbid(unsafe_code)]

pub mod model;
pub mod presentation;
pub mod scoring;
pub mod time;

pub use scoring::{calculate_score, ScoreOutcome, ScorePolicy};
pub use time::DayZone;
