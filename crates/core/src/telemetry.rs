use std::{env, sync::OnceLock};

use color_eyre::eyre::{self, Context as _};
use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt as _};

static TELEMETRY_INIT: OnceLock<()> = OnceLock::new();

/// Subscriber for the `matcha` binary.
///
/// Logs go to stderr so they never mix with the progress lines on stdout.
/// `RUST_LOG` directives take precedence; anything it leaves unset logs at
/// `default_level`.
pub fn get_subscriber(default_level: LevelFilter) -> impl Subscriber + Send + Sync {
    let directives = env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    Registry::default()
        .with(env_filter(default_level, &directives))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
}

/// Unparseable directives are dropped instead of failing startup.
fn env_filter(default_level: LevelFilter, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(directives)
}

/// Installs `subscriber` as the global default. Only the first call has an effect.
///
/// # Errors
/// Returns an error if another global subscriber was installed elsewhere.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> eyre::Result<()> {
    if TELEMETRY_INIT.set(()).is_err() {
        return Ok(());
    }
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    fn enabled_with(filter: EnvFilter, level: Level) -> bool {
        let subscriber = Registry::default().with(filter);
        tracing::subscriber::with_default(subscriber, || {
            if level == Level::DEBUG {
                tracing::enabled!(Level::DEBUG)
            } else if level == Level::INFO {
                tracing::enabled!(Level::INFO)
            } else {
                tracing::enabled!(Level::WARN)
            }
        })
    }

    #[test]
    fn empty_directives_fall_back_to_default_level() {
        assert!(enabled_with(env_filter(LevelFilter::INFO, ""), Level::INFO));
        assert!(!enabled_with(env_filter(LevelFilter::INFO, ""), Level::DEBUG));
    }

    #[test]
    fn directives_override_default_level() {
        assert!(enabled_with(env_filter(LevelFilter::INFO, "debug"), Level::DEBUG));
        assert!(!enabled_with(env_filter(LevelFilter::INFO, "warn"), Level::INFO));
    }

    #[test]
    fn bad_directives_are_ignored() {
        let filter = env_filter(LevelFilter::WARN, "[[[not a directive");

        assert!(enabled_with(filter, Level::WARN));
    }
}
