//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod declaration_tree;
mod file_system;
mod stylesheet_codec;

pub use declaration_tree::{DeclarationTree, WalkAction};
pub use file_system::{FileSystem, FileSystemError};
pub use stylesheet_codec::StylesheetCodec;
