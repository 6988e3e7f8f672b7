//! HTTP access to the scoring service
//!
//! Multipart upload of the document and links, response validation, and the
//! once-per-process warm-up ping.

mod http;
mod warmup;

pub use http::{ClientConfig, HttpScoringService, DEFAULT_BASE_URL};
pub use warmup::spawn_warm_up;
