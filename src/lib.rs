/*!
# plus3dsk

A Rust library for building, inspecting and extracting ZX Spectrum +3 /
Amstrad PCW DSK disk images with +3DOS filesystem support.

## Features

- Read Standard and Extended DSK containers; write Extended
- Track and sector abstraction with FDC status bytes
- CP/M +3 filesystem on the PCW-180K profile: directory, extents,
  allocation blocks
- +3DOS 128-byte file headers: synthesis, detection and checksums
- 8.3 name normalisation with collision handling
- Idiomatic Rust API with comprehensive error handling

## Quick Start

```rust,no_run
use plus3dsk::{build_disk, read_dsk, write_dsk, FileItem, Plus3FileSystem};

// Build an image from file bodies
let items = vec![FileItem {
    name: "hello.bas".to_string(),
    data: b"10 PRINT \"HI\"\n".to_vec(),
}];
let image = build_disk(items)?;
write_dsk(&image, "out.dsk")?;

// Read one back
let image = read_dsk("games.dsk")?;
let fs = Plus3FileSystem::open(&image)?;
for file in fs.files() {
    println!("{}.{}: {} bytes", file.name, file.ext, file.size_from_rc);
}
# Ok::<(), plus3dsk::DskError>(())
```

## The profile

The filesystem layer targets the single-sided 40-track 180K layout
shared by the Spectrum +3 and the PCW: 9 x 512-byte sectors per track,
one reserved track, a 2 KiB directory on track 1 and 1 KiB allocation
blocks numbered absolutely from the start of the data area.

## Modules

- `format`: container dialects and the +3/PCW profile constants
- `image`: core image data structures (DiskImage, Track, Sector)
- `io`: reading and writing DSK container files
- `filesystem`: CP/M +3 directory, allocator and +3DOS headers
- `fdc`: FDC (Floppy Disk Controller) status bytes
- `error`: error types and Result alias
*/

#![warn(missing_docs)]

/// Error types and Result alias
pub mod error;
/// FDC (Floppy Disk Controller) status bytes
pub mod fdc;
/// CP/M +3 filesystem support
pub mod filesystem;
/// DSK container dialects and profile constants
pub mod format;
/// Core image data structures (DiskImage, Track, Sector)
pub mod image;
/// Reading and writing DSK container files
pub mod io;

// Re-export common types
pub use error::{DskError, Result};
pub use fdc::{FdcStatus1, FdcStatus2};
pub use filesystem::{
    build_disk, DirEntry, DiskParameterBlock, FileEntry, FileItem, Plus3FileSystem, Plus3Header,
};
pub use format::{detect_format, DskFormat};
pub use image::{DiskImage, Sector, SectorId, Track};
pub use io::{emit_dsk, parse_dsk, read_dsk, write_dsk};
