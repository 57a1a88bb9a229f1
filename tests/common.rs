#![allow(dead_code)]

use std::{collections::HashMap, path::PathBuf, sync::Mutex};

use anyhow::Result;
use async_trait::async_trait;
use deploio_env::{
    config::{GeneratorConfig, MysqlKind, ResourceKind, S3Config, SecretFlag},
    NctlError, ResourceClient,
};
use serde_json::{json, Value};

pub const DB_CA: &str = "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIUDB\n-----END CERTIFICATE-----";
pub const KVS_CA: &str = "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIUKVS\n-----END CERTIFICATE-----";

/// In-memory stand-in for nctl. Unknown resources fail the way nctl does.
#[derive(Default)]
pub struct FakeClient {
    resources: HashMap<(ResourceKind, String), Value>,
    secrets: HashMap<(ResourceKind, String, SecretFlag), String>,
    calls: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn with_resource(mut self, kind: ResourceKind, name: &str, resource: Value) -> Self {
        self.resources.insert((kind, name.to_string()), resource);
        self
    }

    pub fn with_secret(mut self, kind: ResourceKind, name: &str, flag: SecretFlag, value: &str) -> Self {
        self.secrets.insert((kind, name.to_string(), flag), value.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(kind: ResourceKind, name: &str) -> anyhow::Error {
        NctlError::CommandFailed {
            status: 1,
            message: format!("Error: {} \"{}\" not found", kind, name),
        }
        .into()
    }
}

#[async_trait]
impl ResourceClient for FakeClient {
    async fn get_json(&self, kind: ResourceKind, name: &str, project: &str) -> Result<Value> {
        self.record(format!("get {} {} -p {} -o json", kind, name, project));
        self.resources
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| Self::not_found(kind, name))
    }

    async fn get_secret(&self, kind: ResourceKind, name: &str, project: &str, flag: SecretFlag) -> Result<String> {
        self.record(format!("get {} {} -p {} {}", kind, name, project, flag));
        self.secrets
            .get(&(kind, name.to_string(), flag))
            .cloned()
            .ok_or_else(|| Self::not_found(kind, name))
    }
}

/// The `demo-1` project: `db1` without a port, `cache1` on 6380.
pub fn demo_client() -> FakeClient {
    FakeClient::default()
        .with_resource(
            ResourceKind::Mysql,
            "db1",
            json!({ "status": { "atProvider": { "fqdn": "db1.example.internal" } } }),
        )
        .with_secret(ResourceKind::Mysql, "db1", SecretFlag::User, "alice")
        .with_secret(ResourceKind::Mysql, "db1", SecretFlag::Password, "p@ss:word")
        .with_secret(ResourceKind::Mysql, "db1", SecretFlag::CaCert, DB_CA)
        .with_resource(
            ResourceKind::KeyValueStore,
            "cache1",
            json!({ "status": { "atProvider": { "fqdn": "cache1.example.internal", "port": 6380 } } }),
        )
        .with_secret(ResourceKind::KeyValueStore, "cache1", SecretFlag::Password, "s3cr3t")
        .with_secret(ResourceKind::KeyValueStore, "cache1", SecretFlag::CaCert, KVS_CA)
}

pub fn demo_config() -> GeneratorConfig {
    GeneratorConfig {
        project: "demo-1".to_string(),
        app: None,
        mysql_kind: MysqlKind::Mysql,
        mysql_name: "db1".to_string(),
        kvs_name: "cache1".to_string(),
        s3: S3Config {
            endpoint: "https://cz42.objects.nineapis.ch".to_string(),
            region: "cz42".to_string(),
            bucket: "demo-assets".to_string(),
            access_key: "AKDEMO".to_string(),
            secret_key: "it's-secret".to_string(),
        },
    }
}

/// Writes an executable `nctl` replacement that appends each invocation to
/// `calls.log` in `dir` before running `body`.
#[cfg(unix)]
pub fn write_stub_nctl(dir: &std::path::Path, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("calls.log");
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{}'\n{}\n",
        log.display(),
        body
    );
    let path = dir.join("nctl");
    std::fs::write(&path, script)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// Answers the queries of the `demo-1` project.
pub const DEMO_STUB: &str = r#"case "$2:$3:$6" in
  mysql:db1:-o) echo '{"status":{"atProvider":{"fqdn":"db1.example.internal"}}}' ;;
  mysql:db1:--print-user) echo alice ;;
  mysql:db1:--print-password) echo 'p@ss:word' ;;
  mysql:db1:--print-ca-cert) printf '%s\n' '-----BEGIN CERTIFICATE-----' 'MIIBszCCAVmgAwIBAgIUDB' '-----END CERTIFICATE-----' ;;
  keyvaluestore:cache1:-o) echo '{"status":{"atProvider":{"fqdn":"cache1.example.internal","port":6380}}}' ;;
  keyvaluestore:cache1:--print-password) echo s3cr3t ;;
  keyvaluestore:cache1:--print-ca-cert) printf '%s\n' '-----BEGIN CERTIFICATE-----' 'MIIBszCCAVmgAwIBAgIUKVS' '-----END CERTIFICATE-----' ;;
  *) echo "unexpected call: $*" >&2; exit 9 ;;
esac"#;

/// Full flag set for the `demo-1` project, minus the nctl binary.
pub fn demo_args() -> Vec<String> {
    [
        "--project",
        "demo-1",
        "--mysql-name",
        "db1",
        "--kvs-name",
        "cache1",
        "--s3-endpoint",
        "https://cz42.objects.nineapis.ch",
        "--s3-region",
        "cz42",
        "--s3-bucket",
        "demo-assets",
        "--s3-access-key",
        "AKDEMO",
        "--s3-secret-key",
        "it's-secret",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Environment variables the binary would otherwise pick up from the test
/// runner's environment.
pub const CLI_ENV_VARS: &[&str] = &[
    "NCTL_PROJECT",
    "DEPLOIO_APP",
    "DEPLOIO_MYSQL_KIND",
    "DEPLOIO_MYSQL_NAME",
    "DEPLOIO_KVS_NAME",
    "S3_ENDPOINT",
    "S3_REGION",
    "S3_BUCKET",
    "S3_ACCESS_KEY",
    "S3_SECRET_KEY",
    "NCTL_BIN",
    "RUST_LOG",
];
