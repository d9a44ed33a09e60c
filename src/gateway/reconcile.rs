//! Normalizes gateway responses into a single result shape.
//!
//! The gateway answers with a partially-optional structure: a coarse
//! top-level status, an optional message list, and an optional transaction
//! outcome that itself carries optional messages and errors. Reconciliation
//! is a pure function of that value so every shape can be pinned down with
//! constructed fixtures.

use crate::gateway::types::{GatewayResponse, RESPONSE_CODE_APPROVED, RESULT_STATUS_OK};
use crate::ledger::TransactionResult;

pub const ERROR_NO_RESPONSE: &str = "NO_RESPONSE";
pub const ERROR_TEXT_NO_RESPONSE: &str = "No response from payment gateway";
pub const ERROR_UNKNOWN: &str = "UNKNOWN_ERROR";
pub const ERROR_TEXT_FAILED: &str = "Transaction failed";

/// Normalized outcome of one gateway round trip. String fields default to
/// empty; exactly one of the success fields or the error fields is
/// meaningfully populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledResult {
    pub result: TransactionResult,
    pub result_status: String,
    pub result_code: String,
    pub result_number: String,
    pub result_text: String,
    pub response_code: String,
    pub auth_code: String,
    pub avs_result_code: String,
    pub cvv_result_code: String,
    pub cavv_result_code: String,
    pub network_trans_id: String,
    pub account_number: String,
    pub account_type: String,
    pub trans_id: String,
    pub error: String,
    pub error_text: String,
}

impl ReconciledResult {
    pub fn is_approved(&self) -> bool {
        self.result == TransactionResult::Success
    }
}

/// Maps a gateway response (or its absence) onto a [`ReconciledResult`].
///
/// Approval is decided solely by the transaction outcome's response code
/// equalling `"1"`; the top-level result status is recorded verbatim but
/// never gates success.
pub fn reconcile(response: Option<&GatewayResponse>) -> ReconciledResult {
    let Some(response) = response else {
        return no_response();
    };

    let mut out = ReconciledResult::default();

    if let Some(messages) = &response.messages {
        out.result_status = messages.result_code.clone().unwrap_or_default();

        // First message wins; the remainder is discarded.
        if let Some(first) = messages.message.first() {
            out.result_code = first.code.clone().unwrap_or_default();
            out.result_text = first.text.clone().unwrap_or_default();
        }
    }

    let approved = match &response.transaction_response {
        Some(outcome) => {
            out.response_code = outcome.response_code.clone().unwrap_or_default();
            out.auth_code = outcome.auth_code.clone().unwrap_or_default();
            out.avs_result_code = outcome.avs_result_code.clone().unwrap_or_default();
            out.cvv_result_code = outcome.cvv_result_code.clone().unwrap_or_default();
            out.cavv_result_code = outcome.cavv_result_code.clone().unwrap_or_default();
            out.network_trans_id = outcome.network_trans_id.clone().unwrap_or_default();
            out.account_number = outcome.account_number.clone().unwrap_or_default();
            out.account_type = outcome.account_type.clone().unwrap_or_default();
            out.trans_id = outcome.trans_id.clone().unwrap_or_default();

            if let Some(nested) = outcome.messages.as_ref().and_then(|m| m.message.first()) {
                out.result_number = nested.code.clone().unwrap_or_default();
                // The top-level message text takes precedence; backfill only.
                if out.result_text.is_empty() {
                    out.result_text = nested.description.clone().unwrap_or_default();
                }
            }

            out.response_code == RESPONSE_CODE_APPROVED
        }
        None => false,
    };

    if approved {
        out.result = TransactionResult::Success;
        return out;
    }

    out.result = TransactionResult::Failed;

    // Fallback chain: outcome error, then first top-level message, then
    // the fixed unknown-error sentinels.
    if let Some(first) = response
        .transaction_response
        .as_ref()
        .and_then(|outcome| outcome.errors.as_ref())
        .and_then(|errors| errors.error.first())
    {
        out.error = first.error_code.clone().unwrap_or_default();
        out.error_text = first.error_text.clone().unwrap_or_default();
    }

    if out.error.is_empty() {
        if let Some(first) = response
            .messages
            .as_ref()
            .and_then(|messages| messages.message.first())
        {
            out.error = first.code.clone().unwrap_or_default();
            out.error_text = first.text.clone().unwrap_or_default();
        }
    }

    if out.error.is_empty() {
        out.error = ERROR_UNKNOWN.to_string();
    }
    if out.error_text.is_empty() {
        out.error_text = ERROR_TEXT_FAILED.to_string();
    }

    out
}

fn no_response() -> ReconciledResult {
    ReconciledResult {
        result: TransactionResult::Error,
        error: ERROR_NO_RESPONSE.to_string(),
        error_text: ERROR_TEXT_NO_RESPONSE.to_string(),
        ..ReconciledResult::default()
    }
}

/// Outcome of a profile-management call (no transaction substructure):
/// `Ok` only when the top-level status says so, otherwise the first
/// top-level message's code and text.
pub fn profile_outcome(response: Option<&GatewayResponse>) -> Result<(), (String, String)> {
    let Some(response) = response else {
        return Err((
            ERROR_NO_RESPONSE.to_string(),
            ERROR_TEXT_NO_RESPONSE.to_string(),
        ));
    };

    let status = response
        .messages
        .as_ref()
        .and_then(|messages| messages.result_code.as_deref())
        .unwrap_or_default();

    if status == RESULT_STATUS_OK {
        return Ok(());
    }

    let (code, text) = response
        .messages
        .as_ref()
        .and_then(|messages| messages.message.first())
        .map(|message| {
            (
                message.code.clone().unwrap_or_default(),
                message.text.clone().unwrap_or_default(),
            )
        })
        .unwrap_or_default();

    Err((
        if code.is_empty() {
            ERROR_UNKNOWN.to_string()
        } else {
            code
        },
        if text.is_empty() {
            ERROR_TEXT_FAILED.to_string()
        } else {
            text
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::types::{
        ErrorDetail, OutcomeErrors, OutcomeMessage, OutcomeMessages, ResponseMessage,
        ResponseMessages, TransactionOutcome,
    };

    fn approved_response() -> GatewayResponse {
        GatewayResponse {
            messages: Some(ResponseMessages {
                result_code: Some("Ok".into()),
                message: vec![ResponseMessage {
                    code: Some("I00001".into()),
                    text: Some("Successful.".into()),
                }],
            }),
            transaction_response: Some(TransactionOutcome {
                response_code: Some("1".into()),
                auth_code: Some("XYZ1".into()),
                avs_result_code: Some("Y".into()),
                cvv_result_code: Some("P".into()),
                cavv_result_code: Some("2".into()),
                trans_id: Some("60123456789".into()),
                network_trans_id: Some("NET123".into()),
                account_number: Some("XXXX1111".into()),
                account_type: Some("Visa".into()),
                messages: Some(OutcomeMessages {
                    message: vec![OutcomeMessage {
                        code: Some("1".into()),
                        description: Some("This transaction has been approved.".into()),
                    }],
                }),
                errors: None,
            }),
            ..GatewayResponse::default()
        }
    }

    #[test]
    fn no_response_yields_error_state() {
        let result = reconcile(None);
        assert_eq!(result.result, TransactionResult::Error);
        assert_eq!(result.error, ERROR_NO_RESPONSE);
        assert_eq!(result.error_text, ERROR_TEXT_NO_RESPONSE);
        assert!(result.response_code.is_empty());
    }

    #[test]
    fn approved_response_yields_success() {
        let result = reconcile(Some(&approved_response()));
        assert_eq!(result.result, TransactionResult::Success);
        assert!(result.is_approved());
        assert_eq!(result.auth_code, "XYZ1");
        assert_eq!(result.trans_id, "60123456789");
        assert_eq!(result.network_trans_id, "NET123");
        assert_eq!(result.account_number, "XXXX1111");
        assert!(result.error.is_empty());
        assert!(result.error_text.is_empty());
    }

    #[test]
    fn approval_ignores_top_level_status() {
        // responseCode "1" wins even when the coarse status says Error.
        let mut response = approved_response();
        response.messages.as_mut().unwrap().result_code = Some("Error".into());

        let result = reconcile(Some(&response));
        assert_eq!(result.result, TransactionResult::Success);
        assert_eq!(result.result_status, "Error");
    }

    #[test]
    fn ok_status_without_outcome_is_failed() {
        let response = GatewayResponse {
            messages: Some(ResponseMessages {
                result_code: Some("Ok".into()),
                message: vec![ResponseMessage {
                    code: Some("I00001".into()),
                    text: Some("Successful.".into()),
                }],
            }),
            ..GatewayResponse::default()
        };

        let result = reconcile(Some(&response));
        assert_eq!(result.result, TransactionResult::Failed);
        assert_eq!(result.error, "I00001");
        assert_eq!(result.error_text, "Successful.");
    }

    #[test]
    fn declined_single_error() {
        let response = GatewayResponse {
            messages: Some(ResponseMessages {
                result_code: Some("Error".into()),
                message: vec![ResponseMessage {
                    code: Some("E00027".into()),
                    text: Some("The transaction was unsuccessful.".into()),
                }],
            }),
            transaction_response: Some(TransactionOutcome {
                response_code: Some("2".into()),
                errors: Some(OutcomeErrors {
                    error: vec![ErrorDetail {
                        error_code: Some("27".into()),
                        error_text: Some("Declined".into()),
                    }],
                }),
                ..TransactionOutcome::default()
            }),
            ..GatewayResponse::default()
        };

        let result = reconcile(Some(&response));
        assert_eq!(result.result, TransactionResult::Failed);
        assert!(!result.is_approved());
        assert_eq!(result.error, "27");
        assert_eq!(result.error_text, "Declined");
        assert_eq!(result.response_code, "2");
    }

    #[test]
    fn multi_error_takes_first() {
        let response = GatewayResponse {
            transaction_response: Some(TransactionOutcome {
                response_code: Some("3".into()),
                errors: Some(OutcomeErrors {
                    error: vec![
                        ErrorDetail {
                            error_code: Some("6".into()),
                            error_text: Some("Invalid card number".into()),
                        },
                        ErrorDetail {
                            error_code: Some("8".into()),
                            error_text: Some("Card expired".into()),
                        },
                    ],
                }),
                ..TransactionOutcome::default()
            }),
            ..GatewayResponse::default()
        };

        let result = reconcile(Some(&response));
        assert_eq!(result.error, "6");
        assert_eq!(result.error_text, "Invalid card number");
    }

    #[test]
    fn failure_without_any_error_info_uses_sentinels() {
        let response = GatewayResponse {
            transaction_response: Some(TransactionOutcome {
                response_code: Some("2".into()),
                ..TransactionOutcome::default()
            }),
            ..GatewayResponse::default()
        };

        let result = reconcile(Some(&response));
        assert_eq!(result.result, TransactionResult::Failed);
        assert_eq!(result.error, ERROR_UNKNOWN);
        assert_eq!(result.error_text, ERROR_TEXT_FAILED);
    }

    #[test]
    fn empty_response_object_is_failed_with_sentinels() {
        let result = reconcile(Some(&GatewayResponse::default()));
        assert_eq!(result.result, TransactionResult::Failed);
        assert_eq!(result.error, ERROR_UNKNOWN);
        assert_eq!(result.error_text, ERROR_TEXT_FAILED);
    }

    #[test]
    fn nested_message_never_overwrites_result_text() {
        let result = reconcile(Some(&approved_response()));
        // Top-level text wins; the nested description only backfills.
        assert_eq!(result.result_text, "Successful.");
        assert_eq!(result.result_number, "1");
    }

    #[test]
    fn nested_message_backfills_empty_result_text() {
        let mut response = approved_response();
        response.messages.as_mut().unwrap().message.clear();

        let result = reconcile(Some(&response));
        assert_eq!(result.result_text, "This transaction has been approved.");
        assert_eq!(result.result_number, "1");
    }

    #[test]
    fn outcome_error_beats_top_level_message() {
        let response = GatewayResponse {
            messages: Some(ResponseMessages {
                result_code: Some("Error".into()),
                message: vec![ResponseMessage {
                    code: Some("E00027".into()),
                    text: Some("The transaction was unsuccessful.".into()),
                }],
            }),
            transaction_response: Some(TransactionOutcome {
                response_code: Some("2".into()),
                errors: Some(OutcomeErrors {
                    error: vec![ErrorDetail {
                        error_code: Some("2".into()),
                        error_text: Some("This transaction has been declined.".into()),
                    }],
                }),
                ..TransactionOutcome::default()
            }),
            ..GatewayResponse::default()
        };

        let result = reconcile(Some(&response));
        assert_eq!(result.error, "2");
        assert_eq!(result.error_text, "This transaction has been declined.");
    }

    #[test]
    fn profile_outcome_ok() {
        let response = GatewayResponse {
            messages: Some(ResponseMessages {
                result_code: Some("Ok".into()),
                message: vec![],
            }),
            customer_profile_id: Some("900001".into()),
            ..GatewayResponse::default()
        };

        assert!(profile_outcome(Some(&response)).is_ok());
    }

    #[test]
    fn profile_outcome_error_carries_message() {
        let response = GatewayResponse {
            messages: Some(ResponseMessages {
                result_code: Some("Error".into()),
                message: vec![ResponseMessage {
                    code: Some("E00039".into()),
                    text: Some("A duplicate record already exists.".into()),
                }],
            }),
            ..GatewayResponse::default()
        };

        let err = profile_outcome(Some(&response)).unwrap_err();
        assert_eq!(err.0, "E00039");
        assert_eq!(err.1, "A duplicate record already exists.");
    }

    #[test]
    fn profile_outcome_no_response() {
        let err = profile_outcome(None).unwrap_err();
        assert_eq!(err.0, ERROR_NO_RESPONSE);
    }
}
