use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Resource kinds understood by `nctl get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Mysql,
    MysqlDatabase,
    KeyValueStore,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Mysql => "mysql",
            ResourceKind::MysqlDatabase => "mysqldatabase",
            ResourceKind::KeyValueStore => "keyvaluestore",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database flavour selectable on the command line. `mysqldatabase` is the
/// economy (shared server) offering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MysqlKind {
    #[default]
    Mysql,
    #[value(name = "mysqldatabase")]
    MysqlDatabase,
}

impl From<MysqlKind> for ResourceKind {
    fn from(kind: MysqlKind) -> Self {
        match kind {
            MysqlKind::Mysql => ResourceKind::Mysql,
            MysqlKind::MysqlDatabase => ResourceKind::MysqlDatabase,
        }
    }
}

/// Secret values `nctl get` can print for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretFlag {
    User,
    Password,
    CaCert,
}

impl SecretFlag {
    pub fn as_flag(&self) -> &'static str {
        match self {
            SecretFlag::User => "--print-user",
            SecretFlag::Password => "--print-password",
            SecretFlag::CaCert => "--print-ca-cert",
        }
    }
}

impl fmt::Display for SecretFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Object storage settings. These are not managed by nctl and are passed
/// through to the env entries verbatim.
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &"****")
            .field("secret_key", &"****")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub project: String,
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub mysql_kind: MysqlKind,
    pub mysql_name: String,
    pub kvs_name: String,
    pub s3: S3Config,
}

fn default_nctl_path() -> PathBuf {
    PathBuf::from("nctl")
}

/// Settings for the tool itself, as opposed to the resources it queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_nctl_path")]
    pub nctl_path: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            nctl_path: default_nctl_path(),
        }
    }
}

impl ToolConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// `<config_dir>/deploio-env/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deploio-env").join("config.json"))
    }

    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_json_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading tool config");
                Self::from_json_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
