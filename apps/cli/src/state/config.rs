//! # Configuration State
//!
//! Loaded configuration plus the storefront the command targets.
//!
//! ## Subdomain Resolution (first match wins)
//! 1. `--store <subdomain>` flag
//! 2. Development override saved with `vitrina config set-subdomain`
//! 3. `VITRINA_SUBDOMAIN` / `[store] subdomain` in vitrina.toml

use vitrina_api::VitrinaConfig;
use vitrina_core::validation::validate_subdomain;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone)]
pub struct ConfigState {
    config: VitrinaConfig,
    store_flag: Option<String>,
    dev_subdomain: Option<String>,
}

impl ConfigState {
    pub fn new(config: VitrinaConfig) -> Self {
        ConfigState {
            config,
            store_flag: None,
            dev_subdomain: None,
        }
    }

    pub fn with_store_flag(mut self, subdomain: Option<String>) -> Self {
        self.store_flag = subdomain.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_dev_subdomain(mut self, subdomain: Option<String>) -> Self {
        self.dev_subdomain = subdomain;
        self
    }

    pub fn config(&self) -> &VitrinaConfig {
        &self.config
    }

    /// The storefront subdomain, if any source provides one.
    pub fn subdomain(&self) -> Option<&str> {
        self.store_flag
            .as_deref()
            .or(self.dev_subdomain.as_deref())
            .or(self.config.subdomain())
            .map(str::trim)
    }

    /// Like [`subdomain`](Self::subdomain), but required and validated.
    pub fn require_subdomain(&self) -> CliResult<String> {
        let subdomain = self.subdomain().ok_or_else(|| {
            CliError::config(
                "No store selected. Pass --store, set VITRINA_SUBDOMAIN or run `vitrina config set-subdomain`.",
            )
        })?;
        validate_subdomain(subdomain)?;
        Ok(subdomain.to_string())
    }
}
