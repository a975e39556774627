//! Output rendering for analysis results.

mod json;
mod summary;

pub use json::{to_json, to_json_writer, JsonFormat};
pub use summary::to_summary;
