//! Stable event names and field formatting for `tracing` output.

pub mod events {
    pub const SUBSCRIBE: &str = "subscribe";
    pub const INVOCATION_ISSUED: &str = "invocation_issued";
    pub const INVOCATION_SUCCEEDED: &str = "invocation_succeeded";
    pub const INVOCATION_FAILED: &str = "invocation_failed";
    pub const ARGUMENT_REJECTED: &str = "argument_rejected";
    pub const SUBSCRIPTION_CANCELLED: &str = "subscription_cancelled";
    pub const SIGNAL_SUPPRESSED: &str = "signal_suppressed";
    pub const DELIVERY_SCHEDULED: &str = "delivery_scheduled";
    pub const DELIVERY_FALLBACK: &str = "delivery_fallback";
}

pub mod fields {
    use std::time::Duration;

    pub fn format_ttl(ttl: Option<Duration>) -> String {
        match ttl {
            None => "default".to_string(),
            Some(ttl) if ttl.is_zero() => "none".to_string(),
            Some(ttl) => format!("{}ms", ttl.as_millis()),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::format_ttl;
        use std::time::Duration;

        #[test]
        fn ttl_formats_distinguish_default_and_unbounded() {
            assert_eq!(format_ttl(None), "default");
            assert_eq!(format_ttl(Some(Duration::ZERO)), "none");
            assert_eq!(format_ttl(Some(Duration::from_secs(2))), "2000ms");
        }
    }
}
