//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Install a JSON `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies (e.g. `info`,
/// or `bluesky_ledger=debug` to see every posted operation). Returns `false`
/// if a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init("warn");
        assert!(!init("debug"));
    }
}
