use crate::error::ShimError;
use crate::types::RunRequest;
use async_trait::async_trait;

/// The engine operations the reconciler depends on.
///
/// `list` and `inspect` hand back the engine's raw output untouched; turning
/// it into models is the caller's business.
#[async_trait]
pub trait Shim: Send + Sync {
    /// Raw `ps --all --no-trunc` table, header row included.
    async fn list(&self) -> Result<String, ShimError>;

    /// Raw JSON array describing every container in `ids`.
    async fn inspect(&self, ids: &[String]) -> Result<String, ShimError>;

    /// Creates and starts a detached container, returning its id.
    async fn run(&self, request: &RunRequest) -> Result<String, ShimError>;

    async fn stop(&self, name: &str) -> Result<(), ShimError>;

    async fn remove(&self, name: &str, force: bool) -> Result<(), ShimError>;
}
