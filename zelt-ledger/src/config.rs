// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This file defines a configuration structure containing all settings for the ledger

use zelt_models::address::Address;
use zelt_models::amount::Amount;

/// Ledger configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// address credited with the entire supply at genesis
    pub genesis_address: Address,
    /// total token supply in smallest units
    pub total_supply: Amount,
}
