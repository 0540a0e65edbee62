// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::ZeltSignatureError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use secp256k1::{ecdsa, Message, SECP256K1};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Size of a serialized public key, in bytes (SEC1 compressed)
pub const PUBLIC_KEY_SIZE_BYTES: usize = 33;
/// Size of a serialized secret key, in bytes
pub const SECRET_KEY_SIZE_BYTES: usize = 32;
/// Size of a serialized signature, in bytes (compact encoding)
pub const SIGNATURE_SIZE_BYTES: usize = 64;

/// Computes the 32-byte digest signed by this scheme.
///
/// Signatures commit to the sha256 digest of the message, which is what
/// the secp256k1 engine expects as input.
fn digest(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `KeyPair` is used for signing and is never sent over the wire
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct KeyPair(secp256k1::Keypair);

impl KeyPair {
    /// Generates a new random `KeyPair`
    ///
    /// # Example
    /// ```
    /// # use zelt_signature::KeyPair;
    /// let keypair = KeyPair::generate();
    /// let signature = keypair.sign(b"Hello World!").unwrap();
    /// ```
    pub fn generate() -> KeyPair {
        use secp256k1::rand::rngs::OsRng;
        KeyPair(secp256k1::Keypair::new(SECP256K1, &mut OsRng))
    }

    /// Returns the `Signature` produced by signing `data` with this keypair.
    ///
    /// # Example
    /// ```
    /// # use zelt_signature::KeyPair;
    /// let keypair = KeyPair::generate();
    /// let signature = keypair.sign(b"Hello World!").unwrap();
    /// keypair
    ///     .get_public_key()
    ///     .verify_signature(b"Hello World!", &signature)
    ///     .unwrap();
    /// ```
    pub fn sign(&self, data: &[u8]) -> Result<Signature, ZeltSignatureError> {
        let message = Message::from_digest(digest(data));
        Ok(Signature(
            SECP256K1.sign_ecdsa(&message, &self.0.secret_key()),
        ))
    }

    /// Gets the public key of the keypair
    pub fn get_public_key(&self) -> PublicKey {
        PublicKey(self.0.public_key())
    }

    /// Returns the bytes representing the secret key
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_SIZE_BYTES] {
        self.0.secret_bytes()
    }

    /// Constructs a `KeyPair` from raw secret key bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, ZeltSignatureError> {
        secp256k1::Keypair::from_seckey_slice(SECP256K1, data)
            .map(Self)
            .map_err(|err| {
                ZeltSignatureError::ParsingError(format!("secret key bytes parsing error: {}", err))
            })
    }

    /// Encodes the secret key to a base64 string
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Decodes a `KeyPair` from a base64 string
    pub fn from_base64(data: &str) -> Result<Self, ZeltSignatureError> {
        let bytes = BASE64.decode(data).map_err(|err| {
            ZeltSignatureError::ParsingError(format!("secret key base64 decoding error: {}", err))
        })?;
        KeyPair::from_bytes(&bytes)
    }
}

/// Public key used to check if a message was signed by a specific `KeyPair`.
///
/// Its base64 encoding is also the account address of the key owner.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    /// Checks that `signature` is valid for `data` under this public key.
    ///
    /// Fails with an engine error on any mismatch, never panics.
    pub fn verify_signature(
        &self,
        data: &[u8],
        signature: &Signature,
    ) -> Result<(), ZeltSignatureError> {
        let message = Message::from_digest(digest(data));
        Ok(SECP256K1.verify_ecdsa(&message, &signature.0, &self.0)?)
    }

    /// Returns the compressed SEC1 bytes of the public key
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE_BYTES] {
        self.0.serialize()
    }

    /// Constructs a `PublicKey` from SEC1 bytes (compressed or uncompressed)
    pub fn from_bytes(data: &[u8]) -> Result<Self, ZeltSignatureError> {
        secp256k1::PublicKey::from_slice(data).map(Self).map_err(|err| {
            ZeltSignatureError::ParsingError(format!("public key bytes parsing error: {}", err))
        })
    }

    /// Encodes the public key to a base64 string
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Decodes a `PublicKey` from a base64 string
    pub fn from_base64(data: &str) -> Result<Self, ZeltSignatureError> {
        let bytes = BASE64.decode(data).map_err(|err| {
            ZeltSignatureError::ParsingError(format!("public key base64 decoding error: {}", err))
        })?;
        PublicKey::from_bytes(&bytes)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl FromStr for PublicKey {
    type Err = ZeltSignatureError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PublicKey::from_base64(s)
    }
}

impl ::serde::Serialize for PublicKey {
    fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&self.to_base64())
    }
}

impl<'de> ::serde::Deserialize<'de> for PublicKey {
    fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<PublicKey, D::Error> {
        struct PublicKeyVisitor;

        impl ::serde::de::Visitor<'_> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a base64 encoded public key")
            }

            fn visit_str<E: ::serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                PublicKey::from_base64(v).map_err(E::custom)
            }
        }
        d.deserialize_str(PublicKeyVisitor)
    }
}

/// ECDSA signature over the secp256k1 curve, compact encoding
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Signature(ecdsa::Signature);

impl Signature {
    /// Returns the 64 compact bytes of the signature
    pub fn to_bytes(&self) -> [u8; SIGNATURE_SIZE_BYTES] {
        self.0.serialize_compact()
    }

    /// Constructs a `Signature` from its compact bytes.
    ///
    /// Any length other than `SIGNATURE_SIZE_BYTES` is a parsing error.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ZeltSignatureError> {
        if data.len() != SIGNATURE_SIZE_BYTES {
            return Err(ZeltSignatureError::ParsingError(format!(
                "signature byte length is {}, expected {}",
                data.len(),
                SIGNATURE_SIZE_BYTES
            )));
        }
        ecdsa::Signature::from_compact(data).map(Self).map_err(|err| {
            ZeltSignatureError::ParsingError(format!("signature bytes parsing error: {}", err))
        })
    }

    /// Encodes the signature to a base64 string
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    /// Decodes a `Signature` from a base64 string
    pub fn from_base64(data: &str) -> Result<Self, ZeltSignatureError> {
        let bytes = BASE64.decode(data).map_err(|err| {
            ZeltSignatureError::ParsingError(format!("signature base64 decoding error: {}", err))
        })?;
        Signature::from_bytes(&bytes)
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl FromStr for Signature {
    type Err = ZeltSignatureError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signature::from_base64(s)
    }
}

impl ::serde::Serialize for Signature {
    fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&self.to_base64())
    }
}

impl<'de> ::serde::Deserialize<'de> for Signature {
    fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<Signature, D::Error> {
        struct SignatureVisitor;

        impl ::serde::de::Visitor<'_> for SignatureVisitor {
            type Value = Signature;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a base64 encoded signature")
            }

            fn visit_str<E: ::serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Signature::from_base64(v).map_err(E::custom)
            }
        }
        d.deserialize_str(SignatureVisitor)
    }
}
