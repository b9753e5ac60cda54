//! JSON line format handling for requests and responses
//!
//! This module centralizes all wire format concerns, providing:
//! - InputLine structure for deserialization
//! - Conversion from input lines to domain requests (schema validation)
//! - Response serialization
//!
//! One JSON object per line. A line carrying `account` is a creation
//! request; a line carrying `transaction` is a transaction request:
//!
//! ```text
//! {"account": {"active-card": true, "available-limit": 100}}
//! {"transaction": {"merchant": "Burger King", "amount": 20, "time": "2019-02-13T10:00:00.000Z"}}
//! ```

use crate::types::{
    Account, AccountId, AuthorizationResponse, AuthorizerError, CreateAccountRequest,
    ProcessTransactionRequest, Request, Transaction, DEFAULT_ACCOUNT_ID,
};
use serde::Deserialize;
use std::io::Write;

/// Raw input line
///
/// Exactly one of `account` and `transaction` must be present.
/// `account-id` is optional and defaults to the single-account id.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputLine {
    pub account: Option<Account>,
    pub transaction: Option<Transaction>,
    #[serde(default, rename = "account-id", alias = "accountId")]
    pub account_id: Option<AccountId>,
}

/// Convert an InputLine to a Request
///
/// This function:
/// - Rejects lines carrying neither or both request kinds
/// - Rejects transactions with a zero or negative amount
/// - Fills in the default account id for transactions that omit it
pub fn convert_input_line(line: InputLine) -> Result<Request, AuthorizerError> {
    match (line.account, line.transaction) {
        (Some(account), None) => Ok(Request::CreateAccount(CreateAccountRequest { account })),
        (None, Some(transaction)) => {
            if transaction.amount <= 0 {
                return Err(AuthorizerError::invalid_amount(
                    transaction.amount,
                    &transaction.merchant,
                ));
            }

            Ok(Request::ProcessTransaction(ProcessTransactionRequest {
                account_id: line.account_id.unwrap_or(DEFAULT_ACCOUNT_ID),
                transaction,
            }))
        }
        (Some(_), Some(_)) => Err(AuthorizerError::invalid_request(
            "line carries both 'account' and 'transaction'",
        )),
        (None, None) => Err(AuthorizerError::invalid_request(
            "line carries neither 'account' nor 'transaction'",
        )),
    }
}

/// Decode one input line into a Request
pub fn parse_request(line: &str) -> Result<Request, AuthorizerError> {
    let input: InputLine = serde_json::from_str(line)?;
    convert_input_line(input)
}

/// Decode one raw input line
///
/// # Arguments
///
/// * `raw` - The line's bytes, with or without the trailing newline
/// * `line` - 1-based line number attached to decoding errors
///
/// # Returns
///
/// * `Ok(None)` - The line is blank
/// * `Ok(Some(Request))` - Successfully decoded request
/// * `Err(AuthorizerError)` - Invalid UTF-8, malformed JSON, or an invalid request
pub fn decode_line(raw: &[u8], line: u64) -> Result<Option<Request>, AuthorizerError> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        AuthorizerError::parse_error(Some(line), format!("line is not valid UTF-8: {}", e))
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    parse_request(text).map(Some).map_err(|e| e.at_line(line))
}

/// Write a response as a single JSON line
pub fn write_response(
    response: &AuthorizationResponse,
    output: &mut dyn Write,
) -> Result<(), AuthorizerError> {
    serde_json::to_writer(&mut *output, response)?;
    output.write_all(b"\n")?;
    Ok(())
}
