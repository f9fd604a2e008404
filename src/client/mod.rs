// Client-side (CLI frontend) exports
pub mod api;
pub mod sources;

pub use api::{ApiClient, ApiError};
pub use sources::{InlineTextSource, InputSource, SourceError, TextFileSource};
