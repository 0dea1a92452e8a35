use crate::error::ShimError;
use crate::shim::Shim;
use crate::types::RunRequest;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Drives a Docker-compatible CLI binary.
pub struct DockerShim {
    binary: PathBuf,
}

impl DockerShim {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn docker(&self, args: &[String]) -> Result<String, ShimError> {
        tracing::debug!("Executing {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary).args(args).output().await?;

        if !output.status.success() {
            return Err(ShimError::CommandFailed {
                command: format!("{} {}", self.binary.display(), args.join(" ")),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for DockerShim {
    fn default() -> Self {
        Self::new("docker")
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl Shim for DockerShim {
    async fn list(&self) -> Result<String, ShimError> {
        self.docker(&args(&["ps", "--all", "--no-trunc"])).await
    }

    async fn inspect(&self, ids: &[String]) -> Result<String, ShimError> {
        let mut argv = args(&["inspect"]);
        argv.extend(ids.iter().cloned());
        self.docker(&argv).await
    }

    async fn run(&self, request: &RunRequest) -> Result<String, ShimError> {
        tracing::info!("Running container {} from {}", request.name, request.image);
        let id = self.docker(&request.to_args()).await?;
        Ok(id.trim().to_string())
    }

    async fn stop(&self, name: &str) -> Result<(), ShimError> {
        tracing::info!("Stopping container: {}", name);
        self.docker(&args(&["stop", name])).await?;
        Ok(())
    }

    async fn remove(&self, name: &str, force: bool) -> Result<(), ShimError> {
        tracing::info!("Removing container: {} (force: {})", name, force);
        let argv = if force {
            args(&["rm", "-f", name])
        } else {
            args(&["rm", name])
        };
        self.docker(&argv).await?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // `echo` stands in for the engine binary so the exact argv can be checked.
    fn echo_shim() -> DockerShim {
        DockerShim::new("echo")
    }

    #[tokio::test]
    async fn test_list_arguments() {
        let out = echo_shim().list().await.unwrap();
        assert_eq!(out, "ps --all --no-trunc\n");
    }

    #[tokio::test]
    async fn test_inspect_batches_ids() {
        let ids = vec!["abc".to_string(), "def".to_string()];
        let out = echo_shim().inspect(&ids).await.unwrap();
        assert_eq!(out, "inspect abc def\n");
    }

    #[tokio::test]
    async fn test_run_renders_request() {
        let request = RunRequest::new(
            "web",
            vec!["-e".to_string(), "A=1".to_string()],
            "nginx:latest",
        );
        let out = echo_shim().run(&request).await.unwrap();
        assert_eq!(out, "run -d --name web -e A=1 nginx:latest");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported() {
        let err = DockerShim::new("false").stop("web").await.unwrap_err();
        match err {
            ShimError::CommandFailed { command, code, .. } => {
                assert_eq!(command, "false stop web");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let err = DockerShim::new("/nonexistent/berth-docker")
            .list()
            .await
            .unwrap_err();
        assert!(matches!(err, ShimError::Io(_)));
    }
}
