// crates/fitcore/src/events/mod.rs

mod base;

pub use base::{EventBus, EventEmitter, SubmissionEvent};
