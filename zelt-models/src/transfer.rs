// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::address::Address;
use crate::amount::Amount;
use crate::error::ModelsError;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use zelt_signature::Signature;
use zelt_time::ZeltTime;

/// Wire tag of transfer records
pub const TRANSFER_OPERATION_TAG: &str = "transfer";

/// A signed token transfer record.
///
/// Records are structured and fully validated at decode time: an unknown
/// `"operation"` tag or a missing/malformed field fails deserialization
/// and rejects the record, it never surfaces later as a runtime fault.
///
/// `tx_id` is an opaque identifier carried for audit logs only: ordering
/// and at-most-once application are keyed by the batch index assigned by
/// the sequencer, never by `tx_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// opaque audit identifier chosen by the submitter
    pub tx_id: String,
    /// sender address, which is also the public key the signature is checked against
    /// (wire field name: `public_key`)
    pub sender: Address,
    /// recipient address
    pub recipient: Address,
    /// transferred amount in smallest units
    pub amount: Amount,
    /// submission timestamp, informational only
    pub timestamp: ZeltTime,
    /// ECDSA signature over the canonical transfer message
    pub signature: Signature,
}

impl Transfer {
    /// The canonical message this transfer's signature commits to
    pub fn signed_payload(&self) -> Vec<u8> {
        transfer_message(&self.recipient, self.amount)
    }

    /// Checks the record signature against the sender public key.
    ///
    /// Any decoding or verification failure is an error value, never a
    /// panic: a malformed record must reject, not crash the replica.
    pub fn verify_signature(&self) -> Result<(), ModelsError> {
        let public_key = self.sender.get_public_key()?;
        public_key.verify_signature(&self.signed_payload(), &self.signature)?;
        Ok(())
    }
}

/// Builds the canonical signed message for a transfer:
/// the recipient address and the raw amount, comma separated, UTF-8.
///
/// This encoding must be bit-identical on every replica and on the signing
/// client, otherwise replicas silently diverge on which transfers they
/// accept. Do not change the field order or the separator.
pub fn transfer_message(recipient: &Address, amount: Amount) -> Vec<u8> {
    format!("{},{}", recipient, amount.to_raw()).into_bytes()
}

// Serde is implemented by hand rather than derived with an internally
// tagged enum: tagged deserialization buffers field contents, and buffered
// content cannot carry the full u128 range of `amount`.
impl serde::Serialize for Transfer {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(7))?;
        map.serialize_entry("operation", TRANSFER_OPERATION_TAG)?;
        map.serialize_entry("tx_id", &self.tx_id)?;
        map.serialize_entry("public_key", &self.sender)?;
        map.serialize_entry("recipient", &self.recipient)?;
        map.serialize_entry("amount", &self.amount)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("signature", &self.signature)?;
        map.end()
    }
}

impl<'de> serde::Deserialize<'de> for Transfer {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Transfer, D::Error> {
        struct TransferVisitor;

        impl<'de> Visitor<'de> for TransferVisitor {
            type Value = Transfer;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a transfer record object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                use serde::de::Error;

                let mut operation: Option<String> = None;
                let mut tx_id: Option<String> = None;
                let mut sender: Option<Address> = None;
                let mut recipient: Option<Address> = None;
                let mut amount: Option<Amount> = None;
                let mut timestamp: Option<ZeltTime> = None;
                let mut signature: Option<Signature> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "operation" => operation = Some(map.next_value()?),
                        "tx_id" => tx_id = Some(map.next_value()?),
                        "public_key" => sender = Some(map.next_value()?),
                        "recipient" => recipient = Some(map.next_value()?),
                        "amount" => amount = Some(map.next_value()?),
                        "timestamp" => timestamp = Some(map.next_value()?),
                        "signature" => signature = Some(map.next_value()?),
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                let operation = operation.ok_or_else(|| A::Error::missing_field("operation"))?;
                if operation != TRANSFER_OPERATION_TAG {
                    return Err(A::Error::custom(format!(
                        "unknown operation: {}",
                        operation
                    )));
                }
                Ok(Transfer {
                    tx_id: tx_id.ok_or_else(|| A::Error::missing_field("tx_id"))?,
                    sender: sender.ok_or_else(|| A::Error::missing_field("public_key"))?,
                    recipient: recipient.ok_or_else(|| A::Error::missing_field("recipient"))?,
                    amount: amount.ok_or_else(|| A::Error::missing_field("amount"))?,
                    timestamp: timestamp.ok_or_else(|| A::Error::missing_field("timestamp"))?,
                    signature: signature.ok_or_else(|| A::Error::missing_field("signature"))?,
                })
            }
        }
        d.deserialize_map(TransferVisitor)
    }
}
