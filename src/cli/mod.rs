//! Command-line entry points
//!
//! Both modes load configuration before logging is initialized, so the
//! `logging.level` from a config file can take effect.

pub mod resolve;
pub mod server;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigLoader, Settings};

/// Load settings from `--config`, `RESOLVER_CONFIG` or the default location,
/// with environment overrides applied
pub fn load_settings(config: Option<&str>) -> crate::Result<Settings> {
    ConfigLoader::from_arg(config).load_unvalidated()
}

/// Log filter with precedence `--verbose` > `RUST_LOG` > `logging.level`
pub fn build_env_filter(verbose: bool, configured_level: &str) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(configured_level)
    }
}

/// Install the global subscriber; the client logs to stderr so stdout stays clean
pub fn init_logging(filter: EnvFilter, to_stderr: bool) {
    let registry = tracing_subscriber::registry().with(filter);
    let result = if to_stderr {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_TEST_MUTEX;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn with_rust_log<F: FnOnce()>(value: Option<&str>, f: F) {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let original = std::env::var("RUST_LOG").ok();
        unsafe {
            match value {
                Some(v) => std::env::set_var("RUST_LOG", v),
                None => std::env::remove_var("RUST_LOG"),
            }
        }

        f();

        unsafe {
            std::env::remove_var("RUST_LOG");
            if let Some(rust_log) = original {
                std::env::set_var("RUST_LOG", rust_log);
            }
        }
    }

    #[test]
    fn test_logging_level_from_config_is_respected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[logging]\nlevel = \"error\"").unwrap();
        temp_file.flush().unwrap();

        let settings = {
            let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            load_settings(temp_file.path().to_str()).unwrap()
        };
        assert_eq!(settings.logging.level, "error");

        with_rust_log(None, || {
            let filter = format!("{:?}", build_env_filter(false, &settings.logging.level));
            assert!(filter.to_lowercase().contains("error"), "got: {}", filter);
        });
    }

    #[test]
    fn test_rust_log_env_overrides_config() {
        with_rust_log(Some("warn"), || {
            let filter = format!("{:?}", build_env_filter(false, "error"));
            assert!(filter.to_lowercase().contains("warn"), "got: {}", filter);
        });
    }

    #[test]
    fn test_verbose_flag_takes_highest_precedence() {
        with_rust_log(Some("warn"), || {
            let filter = format!("{:?}", build_env_filter(true, "error"));
            assert!(filter.to_lowercase().contains("debug"), "got: {}", filter);
        });
    }

    #[test]
    fn test_load_settings_missing_file_uses_defaults() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let settings = load_settings(Some("/nonexistent/terabox-resolver.toml")).unwrap();
        assert_eq!(settings.client.error_display_secs, 5);
    }
}
