use thiserror::Error;

/// Why an oracle call produced no usable reply.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no API key configured (set oracle.api_key or ${env_var})")]
    MissingCredential { env_var: String },

    #[error("network support is disabled in this build")]
    NetworkDisabled,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response contained no text")]
    EmptyResponse,

    #[error("malformed oracle reply: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(feature = "network")]
impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        OracleError::Transport(err.to_string())
    }
}
