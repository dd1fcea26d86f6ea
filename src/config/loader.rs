//! Configuration file discovery and loading
//!
//! The file is looked up in this order:
//!
//! 1. an explicit path (`--config`)
//! 2. the `RESOLVER_CONFIG` environment variable
//! 3. `<config_dir>/terabox-resolver/config.toml`
//!
//! Without a file the defaults apply. Environment overrides are merged on
//! top either way.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "RESOLVER_CONFIG";

/// Locates the config file and builds [`Settings`] from it
#[derive(Debug, Default, Clone)]
pub struct ConfigLoader {
    explicit: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader that searches `RESOLVER_CONFIG` and the default location
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader pinned to one file; a missing file is an error
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
        }
    }

    /// Loader from an optional `--config` argument
    pub fn from_arg(path: Option<&str>) -> Self {
        Self {
            explicit: path.map(PathBuf::from),
        }
    }

    /// Resolve which file, if any, supplies the settings
    pub fn config_path(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.explicit {
            if !path.exists() {
                return Err(crate::Error::config(
                    "file",
                    &format!("Configuration file not found: {}", path.display()),
                ));
            }
            return Ok(Some(path.clone()));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(config_path);
            if path.exists() {
                debug!("Using config file from {}: {:?}", CONFIG_ENV, path);
                return Ok(Some(path));
            }
            warn!("{} points to non-existent file: {:?}", CONFIG_ENV, path);
        }

        Ok(Self::default_path().filter(|path| path.exists()))
    }

    /// Platform config location, whether or not the file exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("terabox-resolver").join("config.toml"))
    }

    /// Settings from the resolved file plus environment overrides
    ///
    /// Not validated: the server and the client each check what they need.
    pub fn load_unvalidated(&self) -> Result<Settings> {
        let settings = match self.config_path()? {
            Some(path) => Self::read(&path)?,
            None => {
                debug!("No config file found, using defaults");
                Settings::default()
            }
        };

        settings.merge_with_env()
    }

    /// Settings that passed [`Settings::validate`]
    pub fn load(&self) -> Result<Settings> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;

        debug!("Final configuration: {:?}", settings);
        Ok(settings)
    }

    fn read(path: &Path) -> Result<Settings> {
        info!("Loading configuration from file: {:?}", path);
        Settings::from_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_TEST_MUTEX;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TEST_SECRET: &str = "fedcba9876543210fedcba9876543210";

    #[test]
    fn test_explicit_file_is_read() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[server]
host = "127.0.0.1"
port = 8080

[token]
secret = "{}"
ttl_ms = 12000
        "#,
            TEST_SECRET
        )
        .unwrap();

        let settings = ConfigLoader::with_file(temp_file.path()).load().unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.token.ttl_ms, 12000);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let loader = ConfigLoader::with_file("/nonexistent/terabox-resolver.toml");
        assert!(matches!(
            loader.load_unvalidated(),
            Err(crate::Error::Config { .. })
        ));
    }

    #[test]
    fn test_load_rejects_missing_secret() {
        let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let original_secret = std::env::var("RESOLVER_SECRET").ok();
        unsafe {
            std::env::remove_var("RESOLVER_SECRET");
        }

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[server]\nport = 8080").unwrap();

        let loader = ConfigLoader::with_file(temp_file.path());
        assert!(loader.load().is_err());
        assert!(loader.load_unvalidated().is_ok());

        unsafe {
            if let Some(secret) = original_secret {
                std::env::set_var("RESOLVER_SECRET", secret);
            }
        }
    }

    #[test]
    fn test_from_arg() {
        assert!(ConfigLoader::from_arg(None).explicit.is_none());
        assert_eq!(
            ConfigLoader::from_arg(Some("/etc/resolver.toml")).explicit,
            Some(PathBuf::from("/etc/resolver.toml"))
        );
    }

    #[test]
    fn test_default_path_is_namespaced() {
        if let Some(path) = ConfigLoader::default_path() {
            assert!(path.ends_with("terabox-resolver/config.toml"));
        }
    }
}
