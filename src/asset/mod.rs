//! Asset cache
//!
//! Named resources (textures, models, sounds, ...) loaded by filename and
//! shared by reference count. The cache only checks that a file *looks* like
//! the kind it claims to be; it does not decode it.
//!
//! ```text
//! load("tex.bmp") ──miss──> read bytes ─> validate(kind) ─> thumbnail ─> new entry
//!        └────────hit─────> reference_count += 1 (no re-read)
//! ```

mod asset;
mod library;
mod thumbnail;
mod validate;

pub use asset::{Asset, AssetError, AssetId, AssetKind};
pub use library::AssetCache;
pub use thumbnail::{THUMBNAIL_SIZE, thumbnail_path};
pub use validate::{validate, Validated};
