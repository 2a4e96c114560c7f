use common_utils::{crypto, CustomResult};
use domain_types::{errors::WalletOneError, types::FieldMap};

/// Core trait for source verification of inbound gateway payloads
pub trait SourceVerification {
    /// Shared secret the gateway signs with
    fn get_secrets(&self) -> CustomResult<Vec<u8>, WalletOneError>;

    /// Get the verification algorithm being used
    fn get_algorithm(
        &self,
    ) -> CustomResult<Box<dyn crypto::VerifySignature + Send>, WalletOneError>;

    /// Get the signature value carried by the payload
    fn get_signature(&self, payload: &FieldMap) -> CustomResult<Vec<u8>, WalletOneError>;

    /// Get the message that the signature covers
    fn get_message(
        &self,
        payload: &FieldMap,
        _secrets: &[u8],
    ) -> CustomResult<Vec<u8>, WalletOneError>;

    /// Perform the verification
    fn verify(&self, payload: &FieldMap) -> CustomResult<bool, WalletOneError> {
        let extracted_secrets = self.get_secrets()?;
        let algorithm = self.get_algorithm()?;
        let message = self.get_message(payload, &extracted_secrets)?;
        let signature = self.get_signature(payload)?;

        Ok(algorithm.verify_signature(&extracted_secrets, &signature, &message))
    }
}
