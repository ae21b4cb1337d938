use std::time::Duration;

pub const DEFAULT_TICK_MS: u64 = 500;

#[derive(Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("tick interval must be greater than zero")]
    ZeroTickInterval,
}

/// Settings for one play session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delay between gravity ticks.
    pub tick_interval: Duration,
    /// Fixes the piece sequence when set.
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
        }
    }
}
