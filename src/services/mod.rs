pub mod files;
pub mod import;

pub use files::{FileService, FileUpload};
pub use import::{ImportService, ImportSummary};
