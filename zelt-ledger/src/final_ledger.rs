// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This file defines the final ledger associating addresses to their balances.

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use std::collections::BTreeMap;
use zelt_models::address::Address;
use zelt_models::amount::Amount;

/// Represents the final ledger associating addresses to their token balances.
///
/// The ledger is pure, synchronous arithmetic over an in-memory map: it
/// performs no I/O and no cryptography. It is mutated exclusively by the
/// replication engine applying sequenced transfers, and is read through
/// the replication controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalLedger {
    /// ledger tree, sorted by address
    balances: BTreeMap<Address, Amount>,
}

impl FinalLedger {
    /// Initializes a genesis ledger crediting the genesis address with the
    /// entire token supply.
    ///
    /// Callers must ensure this runs only when no checkpoint exists,
    /// otherwise the supply would be duplicated.
    pub fn new_genesis(config: &LedgerConfig) -> Self {
        let mut balances = BTreeMap::new();
        balances.insert(config.genesis_address.clone(), config.total_supply);
        FinalLedger { balances }
    }

    /// Restores a ledger from a checkpointed balances map
    pub fn from_balances(balances: BTreeMap<Address, Amount>) -> Self {
        FinalLedger { balances }
    }

    /// Gets the balance of an address, zero for unknown addresses.
    /// No side effect: querying never creates an entry.
    pub fn get_balance(&self, addr: &Address) -> Amount {
        self.balances.get(addr).copied().unwrap_or_default()
    }

    /// Read access to the full balances map
    pub fn balances(&self) -> &BTreeMap<Address, Amount> {
        &self.balances
    }

    /// Sum of all balances.
    /// Equals the configured total supply at every observable instant.
    pub fn total(&self) -> Amount {
        self.balances
            .values()
            .fold(Amount::zero(), |acc, amount| acc.saturating_add(*amount))
    }

    /// Number of ledger entries
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether the ledger has no entries
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Applies a single transfer: debit `sender`, credit `recipient`,
    /// creating the recipient entry if absent.
    ///
    /// Either both mutations happen or neither: on any error the ledger is
    /// left exactly as it was.
    pub fn apply_transfer(
        &mut self,
        sender: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let new_sender_balance = self
            .get_balance(sender)
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds(sender.clone()))?;
        if sender == recipient {
            // debit and credit cancel out
            return Ok(());
        }
        let new_recipient_balance = self
            .get_balance(recipient)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(recipient.clone()))?;
        self.balances.insert(sender.clone(), new_sender_balance);
        self.balances
            .insert(recipient.clone(), new_recipient_balance);
        Ok(())
    }
}
