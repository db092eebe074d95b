use std::time::Duration;

use anyhow::Context;
use stsync_config::{EntitiesConfig, StsyncConfig};
use stsync_core::{EntityDescriptor, Environment};
use stsync_db::CrosswalkDb;
use stsync_engine::{EntityMapper, HttpTransport, MapperDefaults, SyncContext};
use stsync_http::{ApiClient, ApiEnvironment, OAuthCredentials, RetryPolicy, fetch_token};

/// Settings loaded once at startup; everything else is built per command.
pub struct AppContext {
    pub config: StsyncConfig,
}

impl AppContext {
    #[must_use]
    pub const fn new(config: StsyncConfig) -> Self {
        Self { config }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let retry = &self.config.sync.retry;
        RetryPolicy {
            max_attempts: retry.max_attempts,
            base_delay: Duration::from_millis(retry.base_delay_ms),
            max_delay: Duration::from_millis(retry.max_delay_ms),
            max_retry_after: Duration::from_secs(retry.max_retry_after_secs),
        }
    }

    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.config.sync.http_timeout_secs)
    }

    pub const fn record_delay(&self) -> Duration {
        Duration::from_millis(self.config.sync.record_delay_ms)
    }

    /// Open the crosswalk file named by `sync.db_path`.
    pub async fn open_store(&self) -> anyhow::Result<CrosswalkDb> {
        let path = &self.config.sync.db_path;
        CrosswalkDb::open_local(path)
            .await
            .with_context(|| format!("failed to open crosswalk database at {path}"))
    }

    pub fn load_entities(&self) -> anyhow::Result<EntitiesConfig> {
        self.config
            .load_entities()
            .context("failed to load entity configuration")
    }

    /// Fetch a token for one side and build its API client.
    pub async fn api_client(&self, env: Environment) -> anyhow::Result<ApiClient> {
        let settings = self.config.environment(env);
        let creds = OAuthCredentials {
            env,
            auth_url: settings.auth_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            scope: settings.scope.clone(),
        };
        let policy = self.retry_policy();
        let token = fetch_token(&creds, self.http_timeout(), &policy).await?;

        let api = ApiEnvironment {
            env,
            api_base: settings.api_base.clone(),
            tenant_id: settings.tenant_id.clone(),
            app_key: settings.app_key.clone(),
            bearer_token: token,
        };
        ApiClient::new(api, self.http_timeout(), policy)
            .with_context(|| format!("failed to build {env} API client"))
    }

    /// Descriptors for every syncable kind in the entity file.
    pub fn descriptors(&self, entities: &EntitiesConfig) -> anyhow::Result<Vec<EntityDescriptor>> {
        let ctx = self.config.descriptor_context();
        entities
            .kinds()
            .into_iter()
            .filter(|kind| kind.is_syncable())
            .map(|kind| entities.descriptor(kind, &ctx).map_err(anyhow::Error::from))
            .collect()
    }

    pub fn mapper_defaults(&self) -> MapperDefaults {
        let defaults = &self.config.defaults;
        MapperDefaults {
            warehouse_id: defaults.warehouse_id.clone(),
            business_unit_id: defaults.business_unit_id.clone(),
            po_type_id: defaults.po_type_id.clone(),
        }
    }

    /// Everything `sync` needs: both clients (one token each), the store, the
    /// mapper, and every configured descriptor.
    pub async fn sync_context(&self) -> anyhow::Result<SyncContext<HttpTransport>> {
        self.sync_context_with(self.mapper_defaults()).await
    }

    /// [`Self::sync_context`] with caller-adjusted mapper defaults.
    pub async fn sync_context_with(
        &self,
        defaults: MapperDefaults,
    ) -> anyhow::Result<SyncContext<HttpTransport>> {
        self.config.require_environments()?;
        let entities = self.load_entities()?;
        let descriptors = self.descriptors(&entities)?;

        let source = self.api_client(Environment::Prod).await?;
        let target = self.api_client(Environment::Int).await?;
        let store = self.open_store().await?;

        let ctx = descriptors.into_iter().fold(
            SyncContext::new(
                store,
                HttpTransport::new(source, target),
                EntityMapper::new(defaults),
            ),
            SyncContext::with_descriptor,
        );
        Ok(ctx)
    }
}
