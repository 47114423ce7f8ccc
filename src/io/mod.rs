/// Reading and writing DSK container files

/// EDSK container parser
pub mod reader;
/// EDSK container emitter
pub mod writer;

pub use reader::{parse_dsk, read_dsk};
pub use writer::{emit_dsk, write_dsk};
