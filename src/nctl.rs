use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use crate::config::{ResourceKind, SecretFlag};

#[derive(Debug, thiserror::Error)]
pub enum NctlError {
    /// nctl ran and exited unsuccessfully. `message` is what it printed.
    #[error("{message}")]
    CommandFailed { status: i32, message: String },
    #[error("failed to run {}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NctlError {
    /// Exit status the process should terminate with.
    pub fn exit_status(&self) -> i32 {
        match self {
            NctlError::CommandFailed { status, .. } => *status,
            NctlError::Spawn { .. } => 1,
        }
    }
}

/// Read access to the resources of a project.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Structured description of a resource (`-o json`).
    async fn get_json(&self, kind: ResourceKind, name: &str, project: &str) -> Result<serde_json::Value>;

    /// A single secret value of a resource, trimmed.
    async fn get_secret(&self, kind: ResourceKind, name: &str, project: &str, flag: SecretFlag) -> Result<String>;
}

#[async_trait]
impl<T: ResourceClient + ?Sized> ResourceClient for &T {
    async fn get_json(&self, kind: ResourceKind, name: &str, project: &str) -> Result<serde_json::Value> {
        (**self).get_json(kind, name, project).await
    }

    async fn get_secret(&self, kind: ResourceKind, name: &str, project: &str, flag: SecretFlag) -> Result<String> {
        (**self).get_secret(kind, name, project, flag).await
    }
}

/// The real `nctl` binary.
#[derive(Debug, Clone)]
pub struct Nctl {
    program: PathBuf,
}

impl Nctl {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Nctl {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs nctl with `args` and returns its trimmed stdout.
    pub async fn run(&self, args: &[&str]) -> Result<String, NctlError> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|source| NctlError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => stdout.trim().to_string(),
                err => err.to_string(),
            };
            // killed by a signal
            let status = output.status.code().unwrap_or(1);
            tracing::debug!(status, "nctl exited unsuccessfully");
            return Err(NctlError::CommandFailed { status, message });
        }

        Ok(stdout.trim().to_string())
    }
}

fn get_args<'a>(kind: ResourceKind, name: &'a str, project: &'a str) -> Vec<&'a str> {
    vec!["get", kind.as_str(), name, "-p", project]
}

#[async_trait]
impl ResourceClient for Nctl {
    async fn get_json(&self, kind: ResourceKind, name: &str, project: &str) -> Result<serde_json::Value> {
        tracing::debug!(%kind, name, project, "fetching resource");
        let mut args = get_args(kind, name, project);
        args.extend(["-o", "json"]);
        let raw = self.run(&args).await?;
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse JSON for {} {}", kind, name))
    }

    async fn get_secret(&self, kind: ResourceKind, name: &str, project: &str, flag: SecretFlag) -> Result<String> {
        tracing::debug!(%kind, name, project, %flag, "fetching secret");
        let mut args = get_args(kind, name, project);
        args.push(flag.as_flag());
        Ok(self.run(&args).await?)
    }
}
