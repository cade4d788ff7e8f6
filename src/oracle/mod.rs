//! Natural-language math solving through a remote language model.
//!
//! The adapter never fails outwards: [`solve`] turns every error into the
//! fixed [`OracleReply::sentinel`] pair after logging it.

mod error;
mod extract;
pub mod gemini;

use serde::{Deserialize, Serialize};

pub use error::OracleError;
pub use extract::extract_number;
pub use gemini::GeminiOracle;

/// Answer shown in place of a result when the oracle is unusable.
pub const SENTINEL_ANSWER: &str = "Chyba";
/// Explanation paired with [`SENTINEL_ANSWER`].
pub const SENTINEL_EXPLANATION: &str = "Nepodařilo se spojit s AI asistentem (zkontrolujte log).";

/// Structured reply of the oracle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReply {
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl OracleReply {
    pub fn sentinel() -> Self {
        Self {
            answer: SENTINEL_ANSWER.to_string(),
            explanation: SENTINEL_EXPLANATION.to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.answer == SENTINEL_ANSWER && self.explanation == SENTINEL_EXPLANATION
    }

    /// The prompt was rejected as non-mathematical.
    pub fn is_empty(&self) -> bool {
        self.answer.trim().is_empty()
    }
}

/// A service that answers math questions in free text.
pub trait MathOracle: Send + Sync {
    fn query(&self, prompt: &str) -> Result<OracleReply, OracleError>;
}

/// Ask `oracle`, replacing any failure with the sentinel pair.
pub fn solve(oracle: &dyn MathOracle, prompt: &str) -> OracleReply {
    tracing::info!(prompt_len = prompt.chars().count(), "oracle request");
    match oracle.query(prompt) {
        Ok(reply) => {
            tracing::info!(answer = %reply.answer, "oracle reply");
            reply
        }
        Err(err) => {
            tracing::error!(error = %err, "oracle request failed");
            OracleReply::sentinel()
        }
    }
}
