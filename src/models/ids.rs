//! Strongly-typed identifiers
//!
//! Account numbers and bank ids are 16-digit decimal numbers; transaction ids
//! are random UUIDs. Newtype wrappers keep them from being mixed up.

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AccountingError;

/// Smallest 16-digit number
pub const SIXTEEN_DIGIT_MIN: u64 = 1_000_000_000_000_000;

/// Largest 16-digit number
pub const SIXTEEN_DIGIT_MAX: u64 = 9_999_999_999_999_999;

fn parse_sixteen_digits(field: &str, s: &str) -> Result<u64, AccountingError> {
    let value: u64 = s
        .trim()
        .parse()
        .map_err(|_| AccountingError::validation(format!("{} must be a 16-digit number", field)))?;
    check_sixteen_digits(field, value)
}

fn check_sixteen_digits(field: &str, value: u64) -> Result<u64, AccountingError> {
    if (SIXTEEN_DIGIT_MIN..=SIXTEEN_DIGIT_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(AccountingError::validation(format!(
            "{} must be between {} and {}",
            field, SIXTEEN_DIGIT_MIN, SIXTEEN_DIGIT_MAX
        )))
    }
}

/// Unique 16-digit account number, the primary key of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(u64);

impl AccountNumber {
    /// Draw a fresh account number from a cryptographically strong source
    pub fn generate<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        Self(rng.gen_range(SIXTEEN_DIGIT_MIN..=SIXTEEN_DIGIT_MAX))
    }

    /// Wrap an existing number, checking that it has 16 digits
    pub fn new(value: u64) -> Result<Self, AccountingError> {
        check_sixteen_digits("accountNumber", value).map(Self)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = AccountingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sixteen_digits("accountNumber", s).map(Self)
    }
}

/// 16-digit identifier of the issuing bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BankId(u64);

impl BankId {
    pub fn new(value: u64) -> Result<Self, AccountingError> {
        check_sixteen_digits("bankId", value).map(Self)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Check the range again, e.g. after deserializing
    pub fn validate(&self) -> Result<(), AccountingError> {
        check_sixteen_digits("bankId", self.0).map(|_| ())
    }
}

impl Default for BankId {
    fn default() -> Self {
        Self(SIXTEEN_DIGIT_MIN)
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BankId {
    type Err = AccountingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sixteen_digits("bankId", s).map(Self)
    }
}

/// Globally unique transaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = AccountingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| AccountingError::validation(format!("id '{}' is not a valid UUID", s)))
    }
}
