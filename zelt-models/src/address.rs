// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::ModelsError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use zelt_signature::PublicKey;

/// An account address: the base64 encoding of the account's public key.
///
/// Addresses are opaque to the ledger. They are compared and used as map
/// keys verbatim and are only ever decoded back into a `PublicKey` by the
/// transaction validator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Derives the address owned by a given public key
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Address(public_key.to_base64())
    }

    /// The raw string form of the address
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the public key this address encodes.
    ///
    /// Only the validator needs this; everything else treats addresses as
    /// opaque strings.
    pub fn get_public_key(&self) -> Result<PublicKey, ModelsError> {
        Ok(PublicKey::from_base64(&self.0)?)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ModelsError::AddressParseError(
                "address cannot be empty".to_string(),
            ));
        }
        Ok(Address(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zelt_signature::KeyPair;

    #[test]
    fn test_address_from_public_key_round_trip() {
        let keypair = KeyPair::generate();
        let address = Address::from_public_key(&keypair.get_public_key());
        assert_eq!(address.get_public_key().unwrap(), keypair.get_public_key());
    }

    #[test]
    fn test_address_serde_is_bare_string() {
        let address = Address::from_str("c29tZSBrZXk=").unwrap();
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"c29tZSBrZXk=\"");
    }

    #[test]
    fn test_empty_address_rejected() {
        assert!(Address::from_str("").is_err());
    }
}
