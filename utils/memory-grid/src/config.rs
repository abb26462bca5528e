//! In-process grid settings.

use std::time::Duration;

/// Settings for an in-process [`MemoryGrid`](crate::MemoryGrid).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryGridConfig {
    /// Instance name. Also used to name the I/O thread.
    pub name: String,
    /// Delay applied before every operation executes.
    pub latency: Duration,
    /// Expiry applied to map writes that do not carry their own ttl.
    /// `None` keeps such entries forever.
    pub default_ttl: Option<Duration>,
}

impl Default for MemoryGridConfig {
    fn default() -> Self {
        Self {
            name: "memory-grid".to_string(),
            latency: Duration::ZERO,
            default_ttl: None,
        }
    }
}

impl MemoryGridConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_default_ttl(mut self, default_ttl: Option<Duration>) -> Self {
        self.default_ttl = default_ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryGridConfig;
    use std::time::Duration;

    #[test]
    fn builder_overrides_defaults() {
        let config = MemoryGridConfig::default()
            .with_name("orders")
            .with_latency(Duration::from_millis(5))
            .with_default_ttl(Some(Duration::from_secs(1)));

        assert_eq!(config.name, "orders");
        assert_eq!(config.latency, Duration::from_millis(5));
        assert_eq!(config.default_ttl, Some(Duration::from_secs(1)));
        assert_eq!(MemoryGridConfig::default().default_ttl, None);
    }
}
