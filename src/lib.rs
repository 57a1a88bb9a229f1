use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::{
    config::{GeneratorConfig, ResourceKind, SecretFlag},
    connection::{database_url, redis_url, Endpoint, MYSQL_DEFAULT_PORT, REDIS_DEFAULT_PORT},
    hints::render_hints,
    yaml::{render_document, EnvEntry},
};

pub mod config;
pub mod connection;
pub mod hints;
pub mod nctl;
pub mod yaml;

pub use nctl::{Nctl, NctlError, ResourceClient};

/// Everything generated for one app.
#[derive(Debug, Clone)]
pub struct Environment {
    pub entries: Vec<EnvEntry>,
    pub database_url: String,
    pub redis_url: String,
}

impl Environment {
    /// Names that occur more than once, in order of first repetition.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            if !seen.insert(entry.name.as_str()) && !duplicates.contains(&entry.name.as_str()) {
                duplicates.push(entry.name.as_str());
            }
        }
        duplicates
    }

    /// The YAML document, followed by the `nctl update app` hints when an
    /// app name is configured.
    pub fn render(&self, config: &GeneratorConfig) -> String {
        let mut out = render_document(&self.entries);
        if let Some(app) = &config.app {
            out.push_str(&render_hints(config, app, &self.database_url, &self.redis_url));
        }
        out
    }
}

pub struct DeploioEnv<C> {
    config: GeneratorConfig,
    client: C,
}

impl<C: ResourceClient> DeploioEnv<C> {
    pub fn new(config: GeneratorConfig, client: C) -> Self {
        DeploioEnv { config, client }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Queries the database and key-value store, strictly one call after the
    /// other, and assembles the env entries. The first failure aborts.
    pub async fn generate(&self) -> Result<Environment> {
        let cfg = &self.config;
        let project = cfg.project.as_str();

        let mysql_kind = ResourceKind::from(cfg.mysql_kind);
        let mysql = self.client.get_json(mysql_kind, &cfg.mysql_name, project).await?;
        let mysql_endpoint = Endpoint::from_resource(&mysql, MYSQL_DEFAULT_PORT)
            .with_context(|| format!("Failed to read endpoint of {} {}", mysql_kind, cfg.mysql_name))?;
        let mysql_user = self
            .client
            .get_secret(mysql_kind, &cfg.mysql_name, project, SecretFlag::User)
            .await?;
        let mysql_password = self
            .client
            .get_secret(mysql_kind, &cfg.mysql_name, project, SecretFlag::Password)
            .await?;
        let mysql_ca = self
            .client
            .get_secret(mysql_kind, &cfg.mysql_name, project, SecretFlag::CaCert)
            .await?;
        let database_url = database_url(&mysql_endpoint, &mysql_user, &mysql_password)?;
        tracing::info!(host = %mysql_endpoint.host, port = mysql_endpoint.port, "database endpoint resolved");

        let kvs_kind = ResourceKind::KeyValueStore;
        let kvs = self.client.get_json(kvs_kind, &cfg.kvs_name, project).await?;
        let kvs_endpoint = Endpoint::from_resource(&kvs, REDIS_DEFAULT_PORT)
            .with_context(|| format!("Failed to read endpoint of {} {}", kvs_kind, cfg.kvs_name))?;
        let kvs_password = self
            .client
            .get_secret(kvs_kind, &cfg.kvs_name, project, SecretFlag::Password)
            .await?;
        let kvs_ca = self
            .client
            .get_secret(kvs_kind, &cfg.kvs_name, project, SecretFlag::CaCert)
            .await?;
        let redis_url = redis_url(&kvs_endpoint, &kvs_password)?;
        tracing::info!(host = %kvs_endpoint.host, port = kvs_endpoint.port, "cache endpoint resolved");

        let entries = vec![
            EnvEntry::new("ALLOW_DB_CREATE", "false"),
            EnvEntry::new("DATABASE_URL", database_url.as_str()),
            EnvEntry::new("DB_CHARSET", "utf8mb4"),
            EnvEntry::new("DB_SSL_CA_PEM", mysql_ca),
            EnvEntry::new("REDIS_CA_PEM", kvs_ca),
            EnvEntry::new("REDIS_URL", redis_url.as_str()),
            EnvEntry::new("S3_ENDPOINT", cfg.s3.endpoint.as_str()),
            EnvEntry::new("S3_REGION", cfg.s3.region.as_str()),
            EnvEntry::new("S3_BUCKET", cfg.s3.bucket.as_str()),
            EnvEntry::new("S3_ACCESS_KEY", cfg.s3.access_key.as_str()),
            EnvEntry::new("S3_SECRET_KEY", cfg.s3.secret_key.as_str()),
            EnvEntry::new("S3_USE_PATH_STYLE", "true"),
        ];

        let environment = Environment {
            entries,
            database_url,
            redis_url,
        };
        let duplicates = environment.duplicate_names();
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "env entries share a name; the YAML list will repeat them");
        }
        Ok(environment)
    }
}
