/// Diagnostic code reported for signature mismatches
pub const ERROR_SIGNATURE: u16 = 101;
/// Diagnostic code reported for every failure without a dedicated code
pub const ERROR_UNKNOWN: u16 = 201;
/// Diagnostic code reported for currencies the gateway does not process
pub const ERROR_HAVE_NOT_CURRENCY: u16 = 301;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum WalletOneError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
    #[error("{0}")]
    Signature(#[from] SignatureError),
    #[error("{state}")]
    PaymentRejected { state: String },
    #[error("WalletOne does not support {currency}")]
    UnsupportedCurrency { currency: String },
}

impl WalletOneError {
    /// Numeric code the gateway integration reports alongside the message
    pub fn error_code(&self) -> u16 {
        match self {
            Self::Signature(SignatureError::SignatureMismatch) => ERROR_SIGNATURE,
            Self::UnsupportedCurrency { .. } => ERROR_HAVE_NOT_CURRENCY,
            Self::Configuration(_) | Self::Signature(_) | Self::PaymentRejected { .. } => {
                ERROR_UNKNOWN
            }
        }
    }

    /// True when the request could not be trusted, as opposed to a
    /// legitimate decline reported by the gateway.
    pub fn is_security_failure(&self) -> bool {
        matches!(self, Self::Signature(_))
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Error configuration WalletOne, need set - {}", fields.join(", "))]
    MissingRequiredFields { fields: Vec<&'static str> },
    #[error("You cannot use `{requested}` method along with `{existing}` method")]
    ConflictingPaymentMethodFilters {
        requested: &'static str,
        existing: &'static str,
    },
    #[error("Invalid value for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(String),
    #[error("Unsupported signature method `{0}`, expected `sha1` or `md5`")]
    InvalidSignatureMethod(String),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Empty POST data received")]
    EmptyPayload,
    #[error("Secret key or signature method is not configured")]
    NotConfigured,
    #[error("Wrong signature method")]
    UnsupportedAlgorithm { algorithm: String },
    #[error("Response data does not have signature")]
    SignatureNotFound,
    #[error("Signature is wrong")]
    SignatureMismatch,
}
