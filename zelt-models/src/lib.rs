// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! All the structures that are used everywhere
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

/// account addresses
pub mod address;
/// token amounts
pub mod amount;
/// token-wide constants
pub mod config;
/// batch cursor
pub mod cursor;
/// models error
pub mod error;
/// transfer records
pub mod transfer;

pub use error::ModelsError;
