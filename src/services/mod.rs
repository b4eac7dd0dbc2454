//! Service layer: feed reduction and the user directory.

pub mod directory_service;
pub mod reducer;

pub use directory_service::{DirectoryService, DirectorySettings};
