//! Wire formats accepted by the exporter.
//!
//! Only one inbound document exists today: the test-run submission record
//! posted to `/results`. Decoding never panics; malformed input is reported
//! as `IqeError` so the HTTP layer can turn it into a 400.

pub mod record;

pub use record::{
    parse_credits, LabelTuple, RunCredits, SubmissionRecord, TestResults, LABEL_NAMES,
};
