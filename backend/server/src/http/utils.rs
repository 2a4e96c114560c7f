use axum::{
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use connector_integration::connectors::walletone::responses::NotificationResponse;
use domain_types::types::FieldMap;
use serde::de::DeserializeOwned;

use super::error::HttpError;

/// Custom JSON extractor that converts 422 errors to 400 with original error messages
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(HttpError {
                status: StatusCode::BAD_REQUEST,
                message: rejection.to_string(),
            }
            .into_response()),
        }
    }
}

/// Decodes an `application/x-www-form-urlencoded` body, keeping repeated keys
pub fn form_fields_from_body(body: &[u8]) -> Result<FieldMap, serde_urlencoded::de::Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
    Ok(FieldMap::from_form_pairs(pairs))
}

/// Plain-text reply in the format the gateway parses
pub fn notification_reply(response: &NotificationResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::OK);
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        response.body(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_form_keys_become_lists() {
        let fields =
            form_fields_from_body(b"WMI_PTENABLED=a&WMI_PTENABLED=b&WMI_PAYMENT_NO=42").unwrap_or_default();
        assert_eq!(fields.get_scalar("WMI_PAYMENT_NO"), Some("42"));
        assert_eq!(
            fields
                .get("WMI_PTENABLED")
                .map(|value| value.values().cloned().collect::<Vec<_>>()),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn form_values_are_decoded_once() {
        let fields = form_fields_from_body(b"WMI_DESCRIPTION=a%2Bb+c").unwrap_or_default();
        assert_eq!(fields.get_scalar("WMI_DESCRIPTION"), Some("a+b c"));
    }
}
