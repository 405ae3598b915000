//! World module - terrain, placed objects and the level file format

mod level;
mod object;
mod terrain;

pub use level::*;
pub use object::*;
pub use terrain::*;
