mod error;
mod reference;
mod types;
pub mod validate;

pub use error::ValidationError;
pub use reference::{DEFAULT_TAG, ImageReference, normalize_image};
pub use types::*;
pub use validate::{is_valid_name, validate};
