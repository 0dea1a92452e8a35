pub mod apply;
pub mod list;
pub mod validate;

pub use apply::{apply, plan};
pub use list::list_containers;
pub use validate::validate_file;
