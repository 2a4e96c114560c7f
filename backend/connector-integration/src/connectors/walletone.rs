pub mod constants;
pub mod responses;
pub mod signature;
pub mod transformers;


use std::{fmt, sync::Arc};

use common_utils::{crypto, CustomResult};
use domain_types::{
    errors::{SignatureError, WalletOneError},
    types::{FieldMap, WalletOneParams},
};
use interfaces::{
    event_interface::{NoopEventHandler, PaymentEventHandler},
    verification::SourceVerification,
};
use secrecy::ExposeSecret;

use self::{
    responses::NotificationResponse,
    transformers::{WalletOneAuth, WalletOneCheckout},
};

/// WalletOne merchant integration: builds checkout requests and checks the
/// notifications the gateway posts back.
#[derive(Clone)]
pub struct WalletOne {
    auth: WalletOneAuth,
    checkout: WalletOneCheckout,
    event_handler: Arc<dyn PaymentEventHandler>,
}

impl fmt::Debug for WalletOne {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletOne")
            .field("auth", &self.auth)
            .field("checkout", &self.checkout)
            .finish_non_exhaustive()
    }
}

impl WalletOne {
    pub fn new(params: &WalletOneParams) -> CustomResult<Self, WalletOneError> {
        Ok(Self {
            auth: WalletOneAuth::try_from(params)?,
            checkout: WalletOneCheckout::new(params)?,
            event_handler: Arc::new(NoopEventHandler),
        })
    }

    #[must_use]
    pub fn with_event_handler(mut self, event_handler: Arc<dyn PaymentEventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    pub fn id(&self) -> &'static str {
        "walletone"
    }

    /// Hosted page the checkout form posts to
    pub fn checkout_url(&self) -> &str {
        self.checkout.endpoint()
    }

    /// Fresh checkout builder seeded with the merchant settings
    pub fn checkout(&self) -> WalletOneCheckout {
        self.checkout.clone()
    }

    /// Checks the signature and order state without firing callbacks
    pub fn check_signature(&self, fields: &FieldMap) -> CustomResult<bool, WalletOneError> {
        signature::verify_with(self, fields)
    }

    /// Checks an inbound notification and notifies the event handler of the
    /// outcome.
    pub fn verify_notification(&self, fields: &FieldMap) -> CustomResult<bool, WalletOneError> {
        let result = self.check_signature(fields);
        match &result {
            Ok(_) => {
                tracing::info!(
                    payment_no = fields.get_scalar(constants::WMI_PAYMENT_NO),
                    "walletone notification accepted"
                );
                self.event_handler.on_success(fields);
            }
            Err(report) => {
                let error = report.current_context();
                if error.is_security_failure() {
                    tracing::warn!(?error, "walletone notification failed verification");
                } else {
                    tracing::info!(
                        payment_no = fields.get_scalar(constants::WMI_PAYMENT_NO),
                        %error,
                        "walletone payment was not accepted"
                    );
                }
                self.event_handler.on_failure(fields, error);
            }
        }
        result
    }

    /// Response body for the gateway matching the verification outcome
    pub fn notification_response(
        &self,
        result: &CustomResult<bool, WalletOneError>,
    ) -> NotificationResponse {
        match result {
            Ok(_) => NotificationResponse::ok(),
            Err(report) => NotificationResponse::from_error(report.current_context()),
        }
    }
}

impl SourceVerification for WalletOne {
    fn get_secrets(&self) -> CustomResult<Vec<u8>, WalletOneError> {
        self.auth
            .signing_secret()
            .map(|secret| secret.expose_secret().as_bytes().to_vec())
            .ok_or(WalletOneError::Signature(SignatureError::NotConfigured).into())
    }

    fn get_algorithm(
        &self,
    ) -> CustomResult<Box<dyn crypto::VerifySignature + Send>, WalletOneError> {
        Ok(Box::new(signature::Base64Digest(self.auth.signature_method)))
    }

    fn get_signature(&self, payload: &FieldMap) -> CustomResult<Vec<u8>, WalletOneError> {
        signature::extract_signature(payload)
    }

    fn get_message(
        &self,
        payload: &FieldMap,
        secrets: &[u8],
    ) -> CustomResult<Vec<u8>, WalletOneError> {
        Ok(signature::signed_message(payload, secrets))
    }
}
