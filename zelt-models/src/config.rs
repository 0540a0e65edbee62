// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Token-wide constants shared by every replica.
//!
//! These values are part of the consensus: changing any of them forks the
//! token, so they live here rather than in runtime settings.

use crate::amount::Amount;

/// Human readable token name
pub const TOKEN_NAME: &str = "ZeltToken";

/// Token ticker symbol
pub const TOKEN_SYMBOL: &str = "ZLT";

/// Number of fractional decimals of the token
pub const TOKEN_DECIMALS: u32 = 18;

/// Scale factor between one token unit and the smallest indivisible unit
pub const AMOUNT_DECIMAL_FACTOR: u128 = 10u128.pow(TOKEN_DECIMALS);

/// Total token supply in smallest units: one billion tokens.
///
/// The genesis address is credited with this entire amount exactly once,
/// and the sum of all balances equals it at every observable instant.
pub const TOTAL_SUPPLY: Amount = Amount::from_raw(1_000_000_000 * AMOUNT_DECIMAL_FACTOR);
