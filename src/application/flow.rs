use crate::application::three_d_secure::{RedirectOutcome, ThreeDSecureRedirect};
use crate::domain::card::CardDetails;
use crate::domain::formatting::clean;
use crate::domain::payment::{
    CHALLENGE_CANCELLED, CHALLENGE_FAILED, PaymentAction, PaymentResponse, PaymentState,
    PaymentStatus, reduce,
};
use crate::domain::ports::{PaymentGatewayBox, TokenizationGatewayBox};
use crate::error::{CheckoutError, Result};
use tracing::{info, warn};

/// Coordinates a single payment attempt.
///
/// `PaymentFlow` exclusively owns the [`PaymentState`] and is its only writer: every
/// change goes through [`reduce`]. Gateway calls are made one after the other and a
/// single attempt never retries.
pub struct PaymentFlow {
    tokenizer: TokenizationGatewayBox,
    payments: PaymentGatewayBox,
    redirect: ThreeDSecureRedirect,
    state: PaymentState,
}

impl PaymentFlow {
    /// Creates a flow in the `idle` state.
    ///
    /// # Arguments
    ///
    /// * `tokenizer` - Exchanges card data for a single-use token.
    /// * `payments` - Requests a payment for a token.
    /// * `redirect` - Sentinel URLs that end the 3-D Secure challenge.
    pub fn new(
        tokenizer: TokenizationGatewayBox,
        payments: PaymentGatewayBox,
        redirect: ThreeDSecureRedirect,
    ) -> Self {
        Self {
            tokenizer,
            payments,
            redirect,
            state: PaymentState::new(),
        }
    }

    pub fn state(&self) -> &PaymentState {
        &self.state
    }

    fn dispatch(&mut self, action: PaymentAction) {
        let previous = self.state.status;
        self.state = reduce(&self.state, action);
        if previous != self.state.status {
            info!(from = %previous, to = %self.state.status, "payment state changed");
        }
    }

    /// Tokenizes the card and requests a 3-D Secure gated payment.
    ///
    /// Gateway failures never surface here: they move the flow to `error`. The only
    /// error returned is [`CheckoutError::FlowBusy`] when the flow is not `idle`, in
    /// which case no gateway is called.
    pub async fn initiate(
        &mut self,
        card_number: &str,
        expiry_month: &str,
        expiry_year: &str,
        cvv: &str,
    ) -> Result<()> {
        if self.state.status != PaymentStatus::Idle {
            warn!(status = %self.state.status, "rejecting payment while another is active");
            return Err(CheckoutError::FlowBusy(self.state.status));
        }

        self.dispatch(PaymentAction::StartTokenizing);
        let card = CardDetails::new(clean(card_number), expiry_month, expiry_year, cvv);
        let action = self.submit(&card).await;
        self.dispatch(action);
        Ok(())
    }

    /// Runs tokenization then payment and yields the one action that follows.
    async fn submit(&self, card: &CardDetails) -> PaymentAction {
        info!(card = %card.masked_number(), "tokenizing card");
        let result: Result<PaymentResponse> = async {
            let token = self.tokenizer.tokenize(card).await?;
            self.payments.pay(&token).await
        }
        .await;

        match result {
            Ok(response) => {
                info!(payment_id = %response.id, status = %response.status, "payment requested");
                response.into_action()
            }
            Err(e) => {
                warn!(error = %e, "payment attempt failed");
                PaymentAction::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Resolves the pending challenge to `success` or `error`.
    ///
    /// Has no effect unless the flow is `pending-3ds`.
    pub fn update_status(&mut self, status: PaymentStatus, error: Option<String>) {
        self.dispatch(PaymentAction::ChallengeResolved {
            status,
            error,
            payment_id: None,
        });
    }

    /// Returns to `idle` with every field cleared.
    pub fn reset(&mut self) {
        self.dispatch(PaymentAction::Reset);
    }

    /// Feeds a URL the challenge page navigated to.
    ///
    /// Returns `true` once a sentinel URL is reached and the challenge is resolved.
    pub fn handle_navigation(&mut self, url: &str) -> bool {
        match self.redirect.classify(url) {
            Some(RedirectOutcome::Success) => {
                self.update_status(PaymentStatus::Success, None);
                true
            }
            Some(RedirectOutcome::Failure) => {
                self.update_status(PaymentStatus::Error, Some(CHALLENGE_FAILED.to_string()));
                true
            }
            None => false,
        }
    }

    /// Abandons the challenge on the user's request.
    pub fn cancel_challenge(&mut self) {
        self.update_status(PaymentStatus::Error, Some(CHALLENGE_CANCELLED.to_string()));
    }
}
