/// How many times an operation runs against a fresh snapshot before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    /// One automatic retry after the first attempt.
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

impl RetryPolicy {
    /// At least one attempt is always made.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Fail on the first conflict.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    #[must_use]
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
