//! Test-run submission record (JSON) and the credit set it validates into.
//!
//! Every field is optional: a missing key or an explicit `null` decodes to
//! the empty string (labels) or zero (counts, time). Unknown keys are
//! ignored so newer runners can send extra data. A repeated key keeps its
//! last value, and anything after the first JSON value in the body is not
//! read.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{IqeError, Result};

/// Label names as exposed on the scrape endpoint, in tuple order.
pub const LABEL_NAMES: [&str; 3] = ["plugin", "priority", "target_app"];

/// Per-run test counts (`results` object).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestResults {
    #[serde(deserialize_with = "null_as_default")]
    pub ran: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub skipped: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub errored: i64,
}

/// One submission as posted by the test runner.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubmissionRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub plugin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: String,
    /// Field name is `targetApp` in JSON.
    #[serde(rename = "targetApp", deserialize_with = "null_as_default")]
    pub target_app: String,
    #[serde(deserialize_with = "null_as_default")]
    pub results: TestResults,
    /// Elapsed seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub time: f64,
}

fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// The (plugin, priority, target_app) tuple that partitions every counter.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelTuple {
    pub plugin: String,
    pub priority: String,
    pub target_app: String,
}

impl LabelTuple {
    pub fn new(
        plugin: impl Into<String>,
        priority: impl Into<String>,
        target_app: impl Into<String>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            priority: priority.into(),
            target_app: target_app.into(),
        }
    }

    /// `(label name, value)` pairs in `LABEL_NAMES` order.
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (LABEL_NAMES[0], self.plugin.as_str()),
            (LABEL_NAMES[1], self.priority.as_str()),
            (LABEL_NAMES[2], self.target_app.as_str()),
        ]
    }
}

/// Validated deltas for the five counters of one label tuple.
///
/// All values are finite and `>= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunCredits {
    pub labels: LabelTuple,
    pub ran: f64,
    pub failed: f64,
    pub skipped: f64,
    pub errored: f64,
    pub time_seconds: f64,
}

impl SubmissionRecord {
    /// Decode a request body. The error text is the JSON decoder's reason.
    pub fn decode(body: &[u8]) -> Result<Self> {
        // no `end()`: trailing bytes after the first value are ignored
        let mut de = serde_json::Deserializer::from_slice(body);
        // a `Value` map keeps the last of any repeated key at every depth
        let value = Value::deserialize(&mut de)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Check every delta and convert to counter credits.
    pub fn into_credits(self) -> Result<RunCredits> {
        let r = self.results;
        let ran = count_delta("ran", r.ran)?;
        let failed = count_delta("failed", r.failed)?;
        let skipped = count_delta("skipped", r.skipped)?;
        let errored = count_delta("errored", r.errored)?;

        if !self.time.is_finite() {
            return Err(IqeError::InvalidValue(format!(
                "time must be finite, got {}",
                self.time
            )));
        }
        if self.time < 0.0 {
            return Err(IqeError::InvalidValue(format!(
                "time must be non-negative, got {}",
                self.time
            )));
        }

        Ok(RunCredits {
            labels: LabelTuple {
                plugin: self.plugin,
                priority: self.priority,
                target_app: self.target_app,
            },
            ran,
            failed,
            skipped,
            errored,
            // adding +0.0 turns -0.0 into +0.0
            time_seconds: self.time + 0.0,
        })
    }
}

/// Decode and validate in one step. Nothing is returned unless the whole
/// record is acceptable.
pub fn parse_credits(body: &[u8]) -> Result<RunCredits> {
    SubmissionRecord::decode(body)?.into_credits()
}

fn count_delta(field: &str, v: i64) -> Result<f64> {
    if v < 0 {
        return Err(IqeError::InvalidValue(format!(
            "results.{field} must be non-negative, got {v}"
        )));
    }
    Ok(v as f64)
}
