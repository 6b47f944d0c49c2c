use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no valid token: {0}")]
    NoValidToken(String),
    #[error("sampling failed: {0}")]
    SamplingFailure(String),
}

impl SamplerError {
    pub(crate) fn invalid_param(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        SamplerError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, SamplerError>;
