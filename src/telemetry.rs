//! Logging setup for the binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's job. The `kakaopack` binary calls [`init_telemetry`] once at
//! startup. Logs go to stderr so they never mix with written output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{KakaopackError, Result};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `level` when set.
///
/// # Errors
///
/// Returns an invalid format error if `level` is not a valid filter
/// directive or a subscriber is already installed.
pub fn init_telemetry(level: &str, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| KakaopackError::invalid_format("log level", e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|e| KakaopackError::invalid_format("log level", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_rejected() {
        // Only meaningful when RUST_LOG doesn't override the level.
        if std::env::var_os("RUST_LOG").is_none() {
            let err = init_telemetry("kakaopack=loudest", false).unwrap_err();
            assert!(err.is_invalid_format());
        }
    }
}
