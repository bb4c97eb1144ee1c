//! Transaction model
//!
//! A transaction moves a strictly positive amount into (deposit) or out of
//! (withdrawal) an account at a point in time. The direction lives only in
//! the type, never in the sign of the amount.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountNumber, TransactionId};
use crate::error::AccountingError;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    /// Parse the wire name (`DEPOSIT` or `WITHDRAWAL`)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DEPOSIT" => Some(Self::Deposit),
            "WITHDRAWAL" => Some(Self::Withdrawal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = AccountingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AccountingError::validation("type Invalid transaction type"))
    }
}

/// Parse a transaction timestamp
///
/// Accepts epoch milliseconds (must be positive) or an RFC 3339 string.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, AccountingError> {
    let s = s.trim();

    if let Ok(millis) = s.parse::<i64>() {
        if millis <= 0 {
            return Err(AccountingError::validation("timestamp must be positive"));
        }
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| AccountingError::validation("timestamp is out of range"));
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AccountingError::validation(
                "timestamp must be epoch milliseconds or an RFC 3339 date-time",
            )
        })
}

/// A monetary transaction on an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The account this transaction belongs to
    pub account_number: AccountNumber,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Amount in integer units, always positive
    pub amount: i64,

    /// When the transaction takes (or took) place
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction with a fresh identifier
    pub fn new(
        account_number: AccountNumber,
        transaction_type: TransactionType,
        amount: i64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            account_number,
            transaction_type,
            amount,
            timestamp,
        }
    }

    /// Amount with the direction applied
    pub fn signed_amount(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Deposit => self.amount,
            TransactionType::Withdrawal => -self.amount,
        }
    }

    /// True when the transaction took place at or before `instant`
    pub fn occurred_by(&self, instant: DateTime<Utc>) -> bool {
        self.timestamp <= instant
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount <= 0 {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        if self.timestamp.timestamp_millis() <= 0 {
            return Err(TransactionValidationError::InvalidTimestamp);
        }
        Ok(())
    }

    /// Wire representation with the timestamp in epoch milliseconds
    pub fn to_response(&self) -> TransactionResponse {
        TransactionResponse {
            id: self.id,
            transaction_type: self.transaction_type,
            amount: self.amount,
            timestamp: self.timestamp.timestamp_millis(),
        }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction[id:{},type:{},amount:{},timestamp:{},account:{}]",
            self.id,
            self.transaction_type,
            self.amount,
            self.timestamp.to_rfc3339(),
            self.account_number
        )
    }
}

/// Transaction as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: i64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(i64),
    InvalidTimestamp,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(_) => write!(f, "amount Transaction amount must be positive"),
            Self::InvalidTimestamp => write!(f, "timestamp must be positive"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
