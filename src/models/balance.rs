//! Balance model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time balance of an account in integer units; may be negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: i64,
}

impl Balance {
    pub fn new(balance: i64) -> Self {
        Self { balance }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.balance)
    }
}
