use crate::config::CheckoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOutcome {
    Success,
    Failure,
}

/// Sentinel URLs the issuer's challenge page redirects to once it is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreeDSecureRedirect {
    success_url: String,
    failure_url: String,
}

impl ThreeDSecureRedirect {
    pub fn new(success_url: impl Into<String>, failure_url: impl Into<String>) -> Self {
        Self {
            success_url: success_url.into(),
            failure_url: failure_url.into(),
        }
    }

    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self::new(config.success_url.clone(), config.failure_url.clone())
    }

    /// Matches a navigated URL against the sentinels.
    ///
    /// The gateway appends query parameters (such as the session id), so a sentinel
    /// only has to appear somewhere in the URL. A blank sentinel never matches.
    pub fn classify(&self, url: &str) -> Option<RedirectOutcome> {
        if reaches(url, &self.success_url) {
            Some(RedirectOutcome::Success)
        } else if reaches(url, &self.failure_url) {
            Some(RedirectOutcome::Failure)
        } else {
            None
        }
    }
}

fn reaches(url: &str, sentinel: &str) -> bool {
    !sentinel.trim().is_empty() && url.contains(sentinel)
}

impl Default for ThreeDSecureRedirect {
    fn default() -> Self {
        Self::from_config(&CheckoutConfig::default())
    }
}
