//! AWS provider error types

use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use orgflow_cloud::ProvisionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("{operation} failed: {code}: {message}")]
    Api {
        operation: &'static str,
        code: String,
        message: String,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error("Invalid request: {0}")]
    Build(String),
}

impl AwsError {
    /// Service error code (e.g. `InvalidChangeBatch`), if the API returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            AwsError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            AwsError::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<AwsError> for ProvisionError {
    fn from(err: AwsError) -> Self {
        ProvisionError::Api(err.to_string())
    }
}

/// Flatten an SDK error into its service code and message, keeping the
/// provider's own wording so it reaches the driver intact
pub(crate) fn sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().unwrap_or("Unknown").to_string();
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    AwsError::Api {
        operation,
        code,
        message,
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_provider_detail() {
        let err = AwsError::Api {
            operation: "CreateAccount",
            code: "ConstraintViolationException".to_string(),
            message: "You have exceeded the allowed number of AWS accounts.".to_string(),
        };
        assert_eq!(err.code(), Some("ConstraintViolationException"));

        let provision: ProvisionError = err.into();
        let text = provision.to_string();
        assert!(text.contains("CreateAccount failed"));
        assert!(text.contains("exceeded the allowed number"));
    }

    #[test]
    fn test_missing_field() {
        let err = AwsError::MissingField {
            operation: "AssumeRole",
            field: "Credentials",
        };
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "AssumeRole response is missing Credentials");
    }
}
