use std::time::Duration;

/// Bounds on each wait of an issuance cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuanceConfig {
    pub signing_timeout: Duration,
    pub submission_timeout: Duration,
    pub max_confirmation_rounds: u32,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            signing_timeout: Duration::from_secs(45),
            submission_timeout: Duration::from_secs(30),
            max_confirmation_rounds: 10,
        }
    }
}
