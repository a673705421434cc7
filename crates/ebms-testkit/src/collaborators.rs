//! Mock wire codec and envelope signer

use async_trait::async_trait;
use ebms_core::{CoreError, EnvelopeSigner, KeyingMaterial, UserMessage, WireCodec};
use sha2::{Digest, Sha256};

/// Codec writing the logical message model as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWireCodec;

impl WireCodec for JsonWireCodec {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn to_wire(&self, message: &UserMessage) -> Result<Vec<u8>, CoreError> {
        Ok(serde_json::to_vec(message)?)
    }

    fn from_wire(&self, payload: &[u8]) -> Result<UserMessage, CoreError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

const SIGNATURE_MARKER: &[u8] = b"\n--signature:";

/// Signer appending a SHA-256 digest over the key alias and the document
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestSigner;

impl DigestSigner {
    fn digest(document: &[u8], keying: &KeyingMaterial) -> String {
        let mut hasher = Sha256::new();
        hasher.update(keying.key_alias.as_bytes());
        hasher.update(document);
        hex::encode(hasher.finalize())
    }

    /// Return the unsigned document if `signed` carries a valid digest for `keying`
    pub fn verify(signed: &[u8], keying: &KeyingMaterial) -> Option<Vec<u8>> {
        let split = signed
            .windows(SIGNATURE_MARKER.len())
            .rposition(|window| window == SIGNATURE_MARKER)?;
        let (document, trailer) = signed.split_at(split);
        let digest = std::str::from_utf8(&trailer[SIGNATURE_MARKER.len()..]).ok()?;
        (digest == Self::digest(document, keying)).then(|| document.to_vec())
    }
}

#[async_trait]
impl EnvelopeSigner for DigestSigner {
    async fn sign(
        &self,
        mut document: Vec<u8>,
        keying: &KeyingMaterial,
    ) -> Result<Vec<u8>, CoreError> {
        let digest = Self::digest(&document, keying);
        document.extend_from_slice(SIGNATURE_MARKER);
        document.extend_from_slice(digest.as_bytes());
        Ok(document)
    }
}

/// Signer whose keystore is unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSigner;

#[async_trait]
impl EnvelopeSigner for FailingSigner {
    async fn sign(
        &self,
        _document: Vec<u8>,
        keying: &KeyingMaterial,
    ) -> Result<Vec<u8>, CoreError> {
        Err(CoreError::collaborator(format!(
            "no key '{}' in keystore",
            keying.key_alias
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test_user_message;

    #[test]
    fn test_json_codec_preserves_message() {
        let message = test_user_message("m1@ebms");
        let wire = JsonWireCodec.to_wire(&message).unwrap();
        assert_eq!(JsonWireCodec.from_wire(&wire).unwrap(), message);
        assert!(JsonWireCodec.from_wire(b"<not json/>").is_err());
    }

    #[tokio::test]
    async fn test_digest_signer_verifies_own_signature() {
        let keying = KeyingMaterial::alias("ap-test");
        let signed = DigestSigner.sign(b"<Envelope/>".to_vec(), &keying).await.unwrap();
        assert_eq!(DigestSigner::verify(&signed, &keying), Some(b"<Envelope/>".to_vec()));
        assert_eq!(DigestSigner::verify(&signed, &KeyingMaterial::alias("other")), None);
        assert_eq!(DigestSigner::verify(b"<Envelope/>", &keying), None);
    }
}
