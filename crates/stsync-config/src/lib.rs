//! # stsync-config
//!
//! Layered configuration loading for stsync using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Legacy flat variables (`ST_CLIENT_ID_PROD`, `STSYNC_DB`, ...)
//! 2. Environment variables (`STSYNC_*` prefix, `__` as separator)
//! 3. `ST_APP_KEY`, a shared fallback for both environments' `app_key`
//! 4. Project-level `.stsync/config.toml`
//! 5. User-level `~/.config/stsync/config.toml`
//! 6. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `STSYNC_PROD__CLIENT_ID` -> `prod.client_id`,
//! `STSYNC_SYNC__RETRY__MAX_ATTEMPTS` -> `sync.retry.max_attempts`, etc.
//!
//! The per-kind entity descriptors live in a separate JSON file, see
//! [`EntitiesConfig`].
//!
//! # Usage
//!
//! ```no_run
//! use stsync_config::StsyncConfig;
//!
//! let config = StsyncConfig::load_with_dotenv().expect("config");
//! let missing = config.missing_fields();
//! if !missing.is_empty() {
//!     eprintln!("set: {}", missing.join(", "));
//! }
//! ```

mod defaults;
mod entities;
mod environment;
mod error;
mod legacy;
mod lenient;
mod sync;

pub use defaults::DefaultsConfig;
pub use entities::{DescriptorContext, EntitiesConfig, EntityEntry, resolve_tenant};
pub use environment::EnvironmentConfig;
pub use error::ConfigError;
pub use sync::{RetrySettings, SyncSettings};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use stsync_core::Environment;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StsyncConfig {
    #[serde(default)]
    pub prod: EnvironmentConfig,
    #[serde(default)]
    pub int: EnvironmentConfig,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl StsyncConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] if you need `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".stsync/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Shared `ST_APP_KEY` fallback, below any per-environment key
        figment = figment
            .merge(legacy::shared_app_key(Environment::Prod.section()))
            .merge(legacy::shared_app_key(Environment::Int.section()));

        // Layer 4: Namespaced environment variables
        figment = figment.merge(Env::prefixed("STSYNC_").split("__"));

        // Layer 5: Legacy flat variables (highest priority)
        figment.merge(legacy::provider())
    }

    /// Connection settings for one side.
    #[must_use]
    pub const fn environment(&self, env: Environment) -> &EnvironmentConfig {
        match env {
            Environment::Prod => &self.prod,
            Environment::Int => &self.int,
        }
    }

    /// Every unset required setting across both environments.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = self.prod.missing_fields(Environment::Prod);
        missing.extend(self.int.missing_fields(Environment::Int));
        missing
    }

    /// Fail with one message naming every unset required setting.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` when anything is missing.
    pub fn require_environments(&self) -> Result<(), ConfigError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured { missing })
        }
    }

    /// Load the entity descriptor file named by `sync.entities_path`.
    ///
    /// # Errors
    ///
    /// See [`EntitiesConfig::load`].
    pub fn load_entities(&self) -> Result<EntitiesConfig, ConfigError> {
        EntitiesConfig::load(&self.sync.entities_path)
    }

    /// Substitution values for [`EntitiesConfig::descriptor`].
    #[must_use]
    pub fn descriptor_context(&self) -> DescriptorContext<'_> {
        DescriptorContext {
            prod_tenant: &self.prod.tenant_id,
            int_tenant: &self.int.tenant_id,
            page_size_default: self.sync.page_size_default,
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stsync").join("config.toml"))
    }
}
