use crate::core::errors::KycError;
use base64::engine::general_purpose;
use base64::Engine;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

/// Signer trait for request authentication
///
/// Implementations turn the canonical signing payload of a request into the
/// value sent in the `signature` body field.
pub trait Signer: Send + Sync {
    /// Sign the payload bytes and return the encoded signature
    fn sign(&self, payload: &[u8]) -> Result<String, KycError>;
}

/// RSA PKCS#1 v1.5 signer over SHA-256 digests, base64 (standard) output
#[derive(Clone)]
pub struct RsaSigner {
    signing_key: SigningKey<Sha256>,
}

impl std::fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaSigner").finish_non_exhaustive()
    }
}

impl RsaSigner {
    /// Create a signer from PEM key material
    ///
    /// Accepts both the traditional PKCS#1 encoding (`RSA PRIVATE KEY`) and the
    /// wrapped PKCS#8 encoding (`PRIVATE KEY`).
    pub fn from_pem(private_key_pem: &[u8]) -> Result<Self, KycError> {
        let private_key = parse_private_key(private_key_pem)?;
        Ok(Self::from_key(private_key))
    }

    pub fn from_key(private_key: RsaPrivateKey) -> Self {
        Self {
            signing_key: SigningKey::<Sha256>::new(private_key),
        }
    }
}

impl Signer for RsaSigner {
    fn sign(&self, payload: &[u8]) -> Result<String, KycError> {
        let mut rng = rand::thread_rng();
        let signature = self
            .signing_key
            .try_sign_with_rng(&mut rng, payload)
            .map_err(|e| KycError::Signing(e.to_string()))?;

        Ok(general_purpose::STANDARD.encode(signature.to_bytes()))
    }
}

/// Sign a payload with a PEM private key in one step
pub fn sign_payload(private_key_pem: &[u8], payload: &[u8]) -> Result<String, KycError> {
    RsaSigner::from_pem(private_key_pem)?.sign(payload)
}

fn parse_private_key(pem: &[u8]) -> Result<RsaPrivateKey, KycError> {
    let pem = std::str::from_utf8(pem)
        .map_err(|_| KycError::KeyParse("private key is not valid PEM text".to_string()))?;
    let pem = pem.trim();

    RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|pkcs1_err| {
            RsaPrivateKey::from_pkcs8_pem(pem).map_err(|pkcs8_err| {
                KycError::KeyParse(format!(
                    "not a PKCS#1 key ({}) nor a PKCS#8 key ({})",
                    pkcs1_err, pkcs8_err
                ))
            })
        })
}

/// Verifies RSA PKCS#1 v1.5 / SHA-256 signatures against a public key
#[derive(Debug, Clone)]
pub struct RsaVerifier {
    verifying_key: VerifyingKey<Sha256>,
}

impl RsaVerifier {
    /// Create a verifier from an SPKI (`PUBLIC KEY`) or PKCS#1
    /// (`RSA PUBLIC KEY`) PEM
    pub fn from_public_key_pem(public_key_pem: &[u8]) -> Result<Self, KycError> {
        let pem = std::str::from_utf8(public_key_pem)
            .map_err(|_| KycError::KeyParse("public key is not valid PEM text".to_string()))?;
        let pem = pem.trim();

        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| KycError::KeyParse(format!("invalid public key: {}", e)))?;

        Ok(Self::from_key(public_key))
    }

    pub fn from_key(public_key: RsaPublicKey) -> Self {
        Self {
            verifying_key: VerifyingKey::<Sha256>::new(public_key),
        }
    }

    /// Check a base64 signature over `payload`
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<(), KycError> {
        let bytes = general_purpose::STANDARD
            .decode(signature)
            .map_err(|e| KycError::Signing(format!("signature is not base64: {}", e)))?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| KycError::Signing(format!("malformed signature: {}", e)))?;

        self.verifying_key
            .verify(payload, &signature)
            .map_err(|e| KycError::Signing(format!("signature mismatch: {}", e)))
    }
}
