//! Convenience macros for common logging patterns in the reconciler.

/// Log a timed operation (measures and logs duration)
#[macro_export]
macro_rules! log_timed {
    ($name:expr, $block:expr) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(target: "timing", operation = $name, duration_ms = duration_ms, "operation completed");
        result
    }};
}

/// Log a call to the Connect REST server
#[macro_export]
macro_rules! log_rest_call {
    ($method:expr, $url:expr) => {
        tracing::debug!(target: "connect_rest", method = %$method, url = %$url, "calling Connect REST API");
    };
    ($method:expr, $url:expr, $status:expr) => {
        tracing::debug!(target: "connect_rest", method = %$method, url = %$url, status = %$status, "Connect REST call completed");
    };
}
