//! JSON test vector loader for submission-record tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub body: BodyData,
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
    /// `decode` or `invalid_value`.
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct BodyData {
    pub encoding: String,
    pub data: serde_json::Value,
}

impl BodyData {
    /// Raw request body bytes.
    ///
    /// `json` vectors carry the document inline; `text` vectors carry the
    /// exact body as a string so malformed input can be expressed.
    pub fn decode(&self) -> Vec<u8> {
        match self.encoding.as_str() {
            "json" => serde_json::to_vec(&self.data).expect("re-encode json vector"),
            "text" => self
                .data
                .as_str()
                .expect("text vector data must be a string")
                .as_bytes()
                .to_vec(),
            other => panic!("unsupported encoding: {other}"),
        }
    }
}
