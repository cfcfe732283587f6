pub mod bounds;
pub mod commands;
pub mod confirm;
pub mod container;
pub mod crop_metadata;
pub mod driver;
pub mod error;
pub mod naming;
pub mod notifier;
pub mod transcoder;

// Re-exports for easy access
pub use bounds::{find_bounds, BoundingBox};
pub use confirm::{AssumeYes, Confirm, StdinPrompt};
pub use container::{ArchiveOptions, Compression};
pub use crop_metadata::CropMetadata;
pub use driver::{ArchiveDriver, EntrySummary, ExtractedFile};
pub use error::{TgaPakError, TranscodeError};
pub use notifier::Notifier;
