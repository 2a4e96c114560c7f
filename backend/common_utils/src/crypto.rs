//! Digest primitives used to sign and verify gateway payloads

/// Generates a digest for the provided message
pub trait GenerateDigest {
    /// Takes a message and returns the raw digest bytes
    fn generate_digest(&self, message: &[u8]) -> Vec<u8>;
}

/// Verifies a signature produced over a message with a shared secret
pub trait VerifySignature {
    /// Takes in a secret, the signature and the message and verifies the message
    /// against the signature
    fn verify_signature(
        &self,
        _secret: &[u8],
        _signature: &[u8],
        _msg: &[u8],
    ) -> bool;
}

/// MD5 hash function
#[derive(Debug, Clone, Copy)]
pub struct Md5;

impl GenerateDigest for Md5 {
    fn generate_digest(&self, message: &[u8]) -> Vec<u8> {
        let digest = md5::compute(message);
        digest.as_ref().to_vec()
    }
}

/// SHA-1 hash function. Only kept for gateways that still sign with it.
#[derive(Debug, Clone, Copy)]
pub struct Sha1;

impl GenerateDigest for Sha1 {
    fn generate_digest(&self, message: &[u8]) -> Vec<u8> {
        let digest = ring::digest::digest(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY, message);
        digest.as_ref().to_vec()
    }
}

#[cfg(test)]
mod crypto_tests {
    use super::{GenerateDigest, Md5, Sha1};

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().fold(String::new(), |mut acc, byte| {
            use std::fmt::Write;
            let _ = write!(&mut acc, "{byte:02x}");
            acc
        })
    }

    #[test]
    fn test_md5_digest() {
        let digest = Md5.generate_digest(b"abc");
        assert_eq!(to_hex(&digest), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha1_digest() {
        let digest = Sha1.generate_digest(b"abc");
        assert_eq!(digest.len(), 20);
        assert_eq!(to_hex(&digest), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn test_empty_message_digest() {
        let digest = Sha1.generate_digest(b"");
        assert_eq!(to_hex(&digest), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        let digest = Md5.generate_digest(b"");
        assert_eq!(to_hex(&digest), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
