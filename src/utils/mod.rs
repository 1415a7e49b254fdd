// Gateway module for utils
// All external access goes through these re-exports

mod errors;
mod logger;

pub use errors::{CdnjsError, Result};
pub use logger::init_logger;
