use serde::{Deserialize, Serialize};
use std::fmt;

pub const GENERIC_FAILURE: &str = "Payment failed";
pub const CHALLENGE_FAILED: &str = "3D Secure authentication failed";
pub const CHALLENGE_CANCELLED: &str = "3D Secure authentication cancelled by user";

/// Lifecycle stage of a single payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    #[default]
    Idle,
    Tokenizing,
    #[serde(rename = "pending-3ds")]
    Pending3ds,
    Success,
    Error,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Idle => "idle",
            PaymentStatus::Tokenizing => "tokenizing",
            PaymentStatus::Pending3ds => "pending-3ds",
            PaymentStatus::Success => "success",
            PaymentStatus::Error => "error",
        };
        f.write_str(label)
    }
}

/// State of one payment attempt.
///
/// Only [`reduce`] produces new values; the flow coordinator owns the single
/// instance and replaces it with each reduced state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentState {
    pub status: PaymentStatus,
    pub three_d_secure_url: Option<String>,
    pub error: Option<String>,
    pub payment_id: Option<String>,
}

/// Title and message shown once an attempt has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub title: &'static str,
    pub message: &'static str,
}

impl PaymentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, PaymentStatus::Success | PaymentStatus::Error)
    }

    /// `None` until the attempt reaches `success` or `error`.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            PaymentStatus::Success => Some(Outcome {
                title: "Payment Successful",
                message: "Your payment has been processed successfully.",
            }),
            PaymentStatus::Error => Some(Outcome {
                title: "Payment Failed",
                message: "We couldn't process your payment.",
            }),
            PaymentStatus::Idle | PaymentStatus::Tokenizing | PaymentStatus::Pending3ds => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentAction {
    StartTokenizing,
    ChallengeIssued {
        redirect_url: String,
        payment_id: String,
    },
    Failed {
        message: String,
    },
    ChallengeResolved {
        status: PaymentStatus,
        error: Option<String>,
        payment_id: Option<String>,
    },
    Reset,
}

/// Computes the next state.
///
/// Transitions not listed here leave the state untouched.
pub fn reduce(state: &PaymentState, action: PaymentAction) -> PaymentState {
    match (state.status, action) {
        (_, PaymentAction::Reset) => PaymentState::default(),
        (PaymentStatus::Idle, PaymentAction::StartTokenizing) => PaymentState {
            status: PaymentStatus::Tokenizing,
            error: None,
            ..state.clone()
        },
        (
            PaymentStatus::Tokenizing,
            PaymentAction::ChallengeIssued {
                redirect_url,
                payment_id,
            },
        ) => PaymentState {
            status: PaymentStatus::Pending3ds,
            three_d_secure_url: Some(redirect_url),
            payment_id: Some(payment_id),
            error: None,
        },
        (PaymentStatus::Tokenizing, PaymentAction::Failed { message }) => PaymentState {
            status: PaymentStatus::Error,
            error: Some(failure_message(Some(message), GENERIC_FAILURE)),
            ..state.clone()
        },
        (
            PaymentStatus::Pending3ds,
            PaymentAction::ChallengeResolved {
                status: PaymentStatus::Success,
                payment_id,
                ..
            },
        ) => PaymentState {
            status: PaymentStatus::Success,
            payment_id: payment_id.or_else(|| state.payment_id.clone()),
            error: None,
            ..state.clone()
        },
        (
            PaymentStatus::Pending3ds,
            PaymentAction::ChallengeResolved {
                status: PaymentStatus::Error,
                error,
                payment_id,
            },
        ) => PaymentState {
            status: PaymentStatus::Error,
            error: Some(failure_message(error, CHALLENGE_FAILED)),
            payment_id: payment_id.or_else(|| state.payment_id.clone()),
            ..state.clone()
        },
        (_, action) => {
            tracing::debug!(status = %state.status, ?action, "ignoring action");
            state.clone()
        }
    }
}

fn failure_message(message: Option<String>, fallback: &str) -> String {
    match message {
        Some(message) if !message.trim().is_empty() => message,
        _ => fallback.to_string(),
    }
}

/// Opaque single-use reference returned by the tokenization gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToken {
    pub token: String,
}

/// Payment status as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayStatus {
    Authorized,
    Pending,
    #[serde(rename = "Card Verified")]
    CardVerified,
    Declined,
    #[serde(rename = "Retry Scheduled")]
    RetryScheduled,
}

impl fmt::Display for GatewayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GatewayStatus::Authorized => "Authorized",
            GatewayStatus::Pending => "Pending",
            GatewayStatus::CardVerified => "Card Verified",
            GatewayStatus::Declined => "Declined",
            GatewayStatus::RetryScheduled => "Retry Scheduled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResponse {
    pub id: String,
    pub status: GatewayStatus,
    pub redirect_url: Option<String>,
}

impl PaymentResponse {
    /// Maps a gateway response to the action it drives.
    ///
    /// Only a pending payment with a redirect link continues to the challenge. Every
    /// other response, including an immediate authorization, fails the attempt.
    pub fn into_action(self) -> PaymentAction {
        match (self.status, self.redirect_url) {
            (GatewayStatus::Pending, Some(redirect_url)) if !redirect_url.is_empty() => {
                PaymentAction::ChallengeIssued {
                    redirect_url,
                    payment_id: self.id,
                }
            }
            (status, _) => PaymentAction::Failed {
                message: format!(
                    "Payment failed with status: {status}. Only 3D Secure payments are supported."
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_state() -> PaymentState {
        let state = reduce(&PaymentState::new(), PaymentAction::StartTokenizing);
        reduce(
            &state,
            PaymentAction::ChallengeIssued {
                redirect_url: "https://3ds.example/challenge".to_string(),
                payment_id: "pay_123".to_string(),
            },
        )
    }

    fn resolved(status: PaymentStatus, error: Option<&str>) -> PaymentAction {
        PaymentAction::ChallengeResolved {
            status,
            error: error.map(str::to_string),
            payment_id: None,
        }
    }

    #[test]
    fn test_initial_state_is_idle_and_empty() {
        let state = PaymentState::new();
        assert_eq!(state.status, PaymentStatus::Idle);
        assert!(state.three_d_secure_url.is_none());
        assert!(state.error.is_none());
        assert!(state.payment_id.is_none());
    }

    #[test]
    fn test_start_tokenizing_clears_error() {
        let state = PaymentState {
            error: Some("stale".to_string()),
            ..PaymentState::default()
        };
        let next = reduce(&state, PaymentAction::StartTokenizing);
        assert_eq!(next.status, PaymentStatus::Tokenizing);
        assert!(next.error.is_none());
    }

    #[test]
    fn test_challenge_issued_sets_url_and_id() {
        let state = pending_state();
        assert_eq!(state.status, PaymentStatus::Pending3ds);
        assert_eq!(
            state.three_d_secure_url.as_deref(),
            Some("https://3ds.example/challenge")
        );
        assert_eq!(state.payment_id.as_deref(), Some("pay_123"));
    }

    #[test]
    fn test_failure_while_tokenizing() {
        let state = reduce(&PaymentState::new(), PaymentAction::StartTokenizing);
        let next = reduce(
            &state,
            PaymentAction::Failed {
                message: "Tokenization failed: card_number_invalid".to_string(),
            },
        );
        assert_eq!(next.status, PaymentStatus::Error);
        assert_eq!(
            next.error.as_deref(),
            Some("Tokenization failed: card_number_invalid")
        );

        let blank = reduce(
            &state,
            PaymentAction::Failed {
                message: String::new(),
            },
        );
        assert_eq!(blank.error.as_deref(), Some(GENERIC_FAILURE));
    }

    #[test]
    fn test_challenge_success_keeps_payment_id() {
        let next = reduce(&pending_state(), resolved(PaymentStatus::Success, None));
        assert_eq!(next.status, PaymentStatus::Success);
        assert_eq!(next.payment_id.as_deref(), Some("pay_123"));
        assert!(next.error.is_none());

        let replaced = reduce(
            &pending_state(),
            PaymentAction::ChallengeResolved {
                status: PaymentStatus::Success,
                error: None,
                payment_id: Some("pay_456".to_string()),
            },
        );
        assert_eq!(replaced.payment_id.as_deref(), Some("pay_456"));
    }

    #[test]
    fn test_challenge_failure_sets_error() {
        let next = reduce(
            &pending_state(),
            resolved(PaymentStatus::Error, Some(CHALLENGE_CANCELLED)),
        );
        assert_eq!(next.status, PaymentStatus::Error);
        assert_eq!(next.error.as_deref(), Some(CHALLENGE_CANCELLED));

        let fallback = reduce(&pending_state(), resolved(PaymentStatus::Error, None));
        assert_eq!(fallback.error.as_deref(), Some(CHALLENGE_FAILED));
    }

    #[test]
    fn test_reset_from_any_state() {
        let states = [
            PaymentState::new(),
            reduce(&PaymentState::new(), PaymentAction::StartTokenizing),
            pending_state(),
            reduce(&pending_state(), resolved(PaymentStatus::Success, None)),
            reduce(&pending_state(), resolved(PaymentStatus::Error, None)),
        ];
        for state in states {
            assert_eq!(reduce(&state, PaymentAction::Reset), PaymentState::default());
        }
    }

    #[test]
    fn test_unlisted_transitions_are_ignored() {
        let idle = PaymentState::new();
        assert_eq!(
            reduce(&idle, resolved(PaymentStatus::Success, None)),
            idle,
            "cannot succeed without a challenge"
        );
        assert_eq!(
            reduce(
                &idle,
                PaymentAction::Failed {
                    message: "boom".to_string()
                }
            ),
            idle
        );

        let pending = pending_state();
        assert_eq!(reduce(&pending, PaymentAction::StartTokenizing), pending);
        assert_eq!(
            reduce(&pending, resolved(PaymentStatus::Tokenizing, None)),
            pending
        );

        let success = reduce(&pending, resolved(PaymentStatus::Success, None));
        assert_eq!(reduce(&success, PaymentAction::StartTokenizing), success);
        assert_eq!(
            reduce(&success, resolved(PaymentStatus::Error, None)),
            success
        );
    }

    #[test]
    fn test_pending_response_issues_challenge() {
        let response = PaymentResponse {
            id: "pay_1".to_string(),
            status: GatewayStatus::Pending,
            redirect_url: Some("https://3ds.example".to_string()),
        };
        assert_eq!(
            response.into_action(),
            PaymentAction::ChallengeIssued {
                redirect_url: "https://3ds.example".to_string(),
                payment_id: "pay_1".to_string(),
            }
        );
    }

    #[test]
    fn test_non_pending_response_fails() {
        let authorized = PaymentResponse {
            id: "pay_1".to_string(),
            status: GatewayStatus::Authorized,
            redirect_url: None,
        };
        assert_eq!(
            authorized.into_action(),
            PaymentAction::Failed {
                message: "Payment failed with status: Authorized. Only 3D Secure payments are supported."
                    .to_string()
            }
        );

        let pending_without_link = PaymentResponse {
            id: "pay_2".to_string(),
            status: GatewayStatus::Pending,
            redirect_url: None,
        };
        assert!(matches!(
            pending_without_link.into_action(),
            PaymentAction::Failed { message } if message.contains("Pending")
        ));
    }

    #[test]
    fn test_gateway_status_wire_names() {
        let status: GatewayStatus = serde_json::from_str("\"Card Verified\"").unwrap();
        assert_eq!(status, GatewayStatus::CardVerified);
        assert_eq!(GatewayStatus::RetryScheduled.to_string(), "Retry Scheduled");
        assert!(serde_json::from_str::<GatewayStatus>("\"Captured\"").is_err());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let json = serde_json::to_value(pending_state()).unwrap();
        assert_eq!(json["status"], "pending-3ds");
        assert_eq!(json["threeDSecureUrl"], "https://3ds.example/challenge");
        assert_eq!(json["paymentId"], "pay_123");
        assert!(json["error"].is_null());
    }

    #[test]
    fn test_outcome_only_for_terminal_states() {
        assert!(PaymentState::new().outcome().is_none());
        let success = reduce(&pending_state(), resolved(PaymentStatus::Success, None));
        assert_eq!(success.outcome().unwrap().title, "Payment Successful");
        assert!(success.is_terminal());
        let failed = reduce(&pending_state(), resolved(PaymentStatus::Error, None));
        assert_eq!(failed.outcome().unwrap().title, "Payment Failed");
    }
}
