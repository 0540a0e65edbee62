// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// Time errors
#[non_exhaustive]
#[derive(Clone, Display, Error, Debug)]
pub enum TimeError {
    /// time overflow error
    TimeOverflowError,
    /// time conversion error
    ConversionError,
}
