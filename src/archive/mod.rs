//! Low-level binary archive used for object payloads.
//!
//! A payload is a sequence of nested, length-prefixed chunks. All values
//! are little-endian.
//!
//! ## Chunk Structure
//!
//! ```text
//! +------------------+
//! | Typecode         |  4 bytes (u32 LE)
//! +------------------+
//! | Length           |  4 bytes (3dm < 50) or 8 bytes (3dm >= 50)
//! +------------------+
//! | Body             |  Length bytes
//! | [CRC-32]         |  last 4 bytes when typecode & 0x8000
//! +------------------+
//! ```
//!
//! Objects are framed by [`write_object`] / [`read_object`]. The version
//! pair describing the dialect is resolved by [`opennurbs_version_to_write`].

mod format;
mod version;
mod writer;
mod reader;
mod object_io;
mod dictionary;

pub use format::*;
pub use version::*;
pub use writer::BufferWriter;
pub use reader::BufferReader;
pub use object_io::*;
pub use dictionary::*;
