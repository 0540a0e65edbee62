// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Stateless validation of sequenced batch payloads.
//!
//! Validation is pure and runs before any lock on the ledger is taken:
//! signature checks are by far the most expensive step of replication and
//! must never block balance reads.

use crate::error::ValidationError;
use serde_json::value::RawValue;
use tracing::warn;
use zelt_models::transfer::Transfer;

/// Splits a batch payload into its individual transaction records without
/// interpreting them.
///
/// Fails only when the payload itself is not a JSON array: a malformed
/// record inside a well-formed array is reported per record by
/// `validate_record` instead, so one bad record cannot take down its
/// siblings.
pub fn decode_batch(payload: &[u8]) -> Result<Vec<Box<RawValue>>, ValidationError> {
    serde_json::from_slice(payload).map_err(|err| {
        ValidationError::DecodeError(format!("batch payload is not a JSON array: {}", err))
    })
}

/// Fully validates a single transaction record.
///
/// A record is accepted only if it decodes as a transfer, moves a strictly
/// positive amount and carries a signature by the sender key over the
/// canonical transfer message. Balance sufficiency is not checked here: it
/// depends on ledger state and is enforced at application time.
pub fn validate_record(record: &RawValue) -> Result<Transfer, ValidationError> {
    let transfer: Transfer = serde_json::from_str(record.get())
        .map_err(|err| ValidationError::DecodeError(err.to_string()))?;
    if transfer.amount.is_zero() {
        return Err(ValidationError::ZeroAmount(transfer.tx_id));
    }
    if let Err(err) = transfer.verify_signature() {
        return Err(ValidationError::InvalidSignature(
            transfer.tx_id,
            err.to_string(),
        ));
    }
    Ok(transfer)
}

/// Decodes and validates a whole batch payload, returning the accepted
/// transfers in payload order.
///
/// Rejected records are logged and skipped. An undecodable payload is an
/// error: the caller decides whether to settle the batch empty or halt.
pub fn validate_batch(payload: &[u8]) -> Result<Vec<Transfer>, ValidationError> {
    let records = decode_batch(payload)?;
    let mut accepted = Vec::with_capacity(records.len());
    for record in &records {
        match validate_record(record) {
            Ok(transfer) => accepted.push(transfer),
            Err(err) => warn!("rejecting transaction record: {}", err),
        }
    }
    Ok(accepted)
}
