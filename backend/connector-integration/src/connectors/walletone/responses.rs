use std::fmt;

use domain_types::errors::WalletOneError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::constants;

/// Bytes left as-is by PHP's `urlencode`; space is turned into `+` afterwards.
const URLENCODE_RESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b' ');

/// Answer returned to the gateway after a notification.
///
/// The gateway only understands `WMI_RESULT=OK` and `WMI_RESULT=RETRY`; any
/// other reply is retried as well, so failures still use status 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationResponse {
    pub state: String,
    pub description: Option<String>,
    pub status_code: u16,
}

impl NotificationResponse {
    pub fn new(state: impl Into<String>, description: impl Into<String>, status_code: u16) -> Self {
        let description = description.into();
        Self {
            state: state.into().to_uppercase(),
            description: (!description.is_empty()).then_some(description),
            status_code,
        }
    }

    pub fn ok() -> Self {
        Self::new(constants::RESULT_OK, "", 200)
    }

    pub fn retry(description: impl Into<String>) -> Self {
        let description = description.into();
        if description.is_empty() {
            Self::new(constants::RESULT_RETRY, constants::UNKNOWN_ERROR, 200)
        } else {
            Self::new(constants::RESULT_RETRY, description, 200)
        }
    }

    pub fn from_error(error: &WalletOneError) -> Self {
        Self::retry(error.to_string())
    }

    pub fn is_ok(&self) -> bool {
        self.state == constants::RESULT_OK
    }

    /// Form-encoded body, e.g. `WMI_RESULT=RETRY&WMI_DESCRIPTION=Signature+is+wrong`
    pub fn body(&self) -> String {
        let mut body = format!("{}={}", constants::WMI_RESULT, urlencode(&self.state));
        if let Some(description) = &self.description {
            body.push('&');
            body.push_str(constants::WMI_DESCRIPTION);
            body.push('=');
            body.push_str(&urlencode(description));
        }
        body
    }
}

impl fmt::Display for NotificationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body())
    }
}

fn urlencode(value: &str) -> String {
    utf8_percent_encode(value, URLENCODE_RESERVED)
        .to_string()
        .replace(' ', "+")
}
