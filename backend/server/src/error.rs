use domain_types::errors::{ConfigurationError as WalletOneConfigError, WalletOneError};

/// Allows [error_stack::Report] to change between error contexts
/// using the dependent [ErrorSwitch] trait to define relations & mappings between traits
pub trait ReportSwitchExt<T, U> {
    /// Switch to the intended report by calling switch
    /// requires error switch to be already implemented on the error type
    fn switch(self) -> Result<T, error_stack::Report<U>>;
}

impl<T, U, V> ReportSwitchExt<T, U> for Result<T, error_stack::Report<V>>
where
    V: ErrorSwitch<U> + error_stack::Context,
    U: error_stack::Context,
{
    #[track_caller]
    fn switch(self) -> Result<T, error_stack::Report<U>> {
        match self {
            Ok(i) => Ok(i),
            Err(er) => {
                let new_c = er.current_context().switch();
                Err(er.change_context(new_c))
            }
        }
    }
}

/// Allow [error_stack::Report] to convert between error types
pub trait ErrorSwitch<T> {
    /// Get the next error type that the source error can be escalated into
    /// This does not consume the source error since we need to keep it in context
    fn switch(&self) -> T;
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid WalletOne settings: {0}")]
    ConnectorError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced to callers of the checkout API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiErrorResponse {
    #[error("{message}")]
    BadRequest { message: String, error_code: u16 },
    #[error("{message}")]
    InternalServerError { message: String, error_code: u16 },
}

impl ErrorSwitch<ApiErrorResponse> for WalletOneError {
    fn switch(&self) -> ApiErrorResponse {
        let message = self.to_string();
        let error_code = self.error_code();
        match self {
            Self::Configuration(WalletOneConfigError::InvalidSignatureMethod(_)) => {
                ApiErrorResponse::InternalServerError {
                    message,
                    error_code,
                }
            }
            Self::Configuration(_)
            | Self::Signature(_)
            | Self::PaymentRejected { .. }
            | Self::UnsupportedCurrency { .. } => ApiErrorResponse::BadRequest {
                message,
                error_code,
            },
        }
    }
}
