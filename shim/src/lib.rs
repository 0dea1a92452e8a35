mod docker;
mod error;
mod shim;
mod types;

pub use docker::DockerShim;
pub use error::ShimError;
pub use shim::Shim;
pub use types::*;
