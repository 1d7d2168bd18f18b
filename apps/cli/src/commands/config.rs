//! # Config Commands
//!
//! Shows the effective configuration and manages the development store
//! override kept in local storage.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;
use vitrina_api::VitrinaConfig;
use vitrina_core::validation::validate_subdomain;

use crate::error::CliResult;
use crate::render::{Message, Render};
use crate::state::AppContext;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView {
    pub config: VitrinaConfig,
    /// Store the shopping commands will use.
    pub store: Option<String>,
    pub config_path: Option<PathBuf>,
    pub database_path: PathBuf,
    pub logged_in: bool,
}

impl Render for ConfigView {
    fn render(&self) -> String {
        let path = |p: Option<&PathBuf>| p.map_or_else(|| "-".to_string(), |p| p.display().to_string());
        format!(
            "API:        {}\nStore:      {}\nLogged in:  {}\nCloudinary: {}\nConfig:     {}\nDatabase:   {}",
            self.config.base_url(),
            self.store.as_deref().unwrap_or("-"),
            if self.logged_in { "yes" } else { "no" },
            self.config.cloudinary.cloud_name.as_deref().unwrap_or("-"),
            path(self.config_path.as_ref()),
            path(Some(&self.database_path)),
        )
    }
}

pub async fn show(ctx: &AppContext, config_path: Option<PathBuf>) -> CliResult<ConfigView> {
    let config = ctx.config.config().clone();
    Ok(ConfigView {
        store: ctx.config.subdomain().map(str::to_string),
        config_path: config_path.or_else(VitrinaConfig::default_config_path),
        database_path: config.database_path(),
        logged_in: ctx.storage().session().get().await?.is_some(),
        config,
    })
}

/// Saves a development store override; it wins over the configured store.
pub async fn set_subdomain(ctx: &AppContext, subdomain: &str) -> CliResult<Message> {
    let subdomain = subdomain.trim().to_ascii_lowercase();
    validate_subdomain(&subdomain)?;
    ctx.storage().settings().set_dev_subdomain(&subdomain).await?;
    info!(subdomain = %subdomain, "Development store override saved");
    Ok(Message::new(format!("Store set to '{}'.", subdomain)))
}

pub async fn clear_subdomain(ctx: &AppContext) -> CliResult<Message> {
    let removed = ctx.storage().settings().clear_dev_subdomain().await?;
    Ok(Message::new(if removed {
        "Store override removed."
    } else {
        "No store override was set."
    }))
}
