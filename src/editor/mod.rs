//! Level Editor
//!
//! Editing state for one open level:
//! - Object store (dense array, monotonic ids)
//! - Selection set with cached bounds
//! - Bounded undo ring
//! - Tool modes, grid snapping and the editor camera

mod camera;
mod selection;
mod state;
mod store;
mod tools;
mod undo;

pub use camera::*;
pub use selection::*;
pub use state::*;
pub use store::*;
pub use tools::*;
pub use undo::*;
