//! Security validator client
//!
//! The validator receives the account holder's details and a callback URL,
//! and later reports its verdict through the account activation entry point.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::SecurityValidatorSettings;
use crate::error::{AccountingError, AccountingResult};
use crate::models::AccountNumber;

/// Body of a security check request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    pub account_number: AccountNumber,
    pub account_holder_name: String,
    pub callback_url: String,
}

/// Something that can ask for a security check
///
/// No verdict is returned; an `Err` only means the request did not get through.
pub trait SecurityValidator: Send + Sync {
    fn security_check(&self, request: &ValidationRequest) -> AccountingResult<()>;
}

/// Validator reached over HTTP
pub struct HttpSecurityValidator {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpSecurityValidator {
    pub fn new(settings: &SecurityValidatorSettings) -> AccountingResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/background-security-check",
                settings.url.trim_end_matches('/')
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SecurityValidator for HttpSecurityValidator {
    fn security_check(&self, request: &ValidationRequest) -> AccountingResult<()> {
        let response = self.client.post(&self.endpoint).json(request).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AccountingError::SecurityCheck(format!(
                "validator answered {} for account {}",
                status, request.account_number
            )));
        }

        Ok(())
    }
}
