use std::path::Path;
use std::time::Duration;

use miette::IntoDiagnostic as _;

pub mod model;

pub use model::*;

/// Optional per-directory config file.
pub const CONFIG_FILE: &str = "scanq.toml";

/// Environment override for the backend address.
pub const BASE_URL_ENV: &str = "SCANQ_BASE_URL";

impl RootConfig {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        let config: Self = toml::from_str(&contents).into_diagnostic()?;

        Ok(config)
    }

    /// Effective config for one invocation. Values from `scanq.toml` in
    /// the working directory (when present) are overridden by the
    /// `SCANQ_BASE_URL` environment variable, which in turn loses to an
    /// explicit `--base-url` flag.
    pub fn resolve(base_url_flag: Option<&str>) -> miette::Result<Self> {
        let path = Path::new(CONFIG_FILE);
        let mut config = if path.is_file() {
            Self::load(path)?
        } else {
            Self::default()
        };

        let env_base_url = std::env::var(BASE_URL_ENV).ok();
        config.overlay(env_base_url.as_deref(), base_url_flag);

        Ok(config)
    }

    fn overlay(&mut self, env_base_url: Option<&str>, flag_base_url: Option<&str>) {
        if let Some(url) = env_base_url {
            self.server.base_url = url.to_string();
        }

        if let Some(url) = flag_base_url {
            self.server.base_url = url.to_string();
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http.timeout_ms)
    }
}
