//! Shared utilities for the Agora engines.

pub mod time;

pub use time::{format_duration, format_wait};
