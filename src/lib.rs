//! Endor level editor core
//!
//! Headless editing model for Endor levels:
//! - Placed objects with typed per-kind properties
//! - Heightmap terrain with sculpt, smooth and texture-paint brushes
//! - Selection, bounded undo history and editor tools
//! - Asset cache with format checks and thumbnails
//! - Plain-text level files
//!
//! [`EditorSession`] ties it all together; everything else is usable on its
//! own.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod asset;
pub mod config;
pub mod editor;
pub mod math;
pub mod world;

pub use config::EditorConfig;
pub use editor::EditorSession;
