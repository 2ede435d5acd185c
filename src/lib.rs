//! Reads and writes fixed-width integers, IEEE 754 floats, raw byte runs and zero padding over
//! `std::io` streams, with an explicitly selected byte order.
//!
//! [`SequentialReader`] wraps any `std::io::Read` and adds lookahead: [`SequentialReader::peek`]
//! fetches upcoming bytes without consuming them, and the next reads are served from those bytes
//! before the source is read again. [`SequentialWriter`] wraps any `std::io::Write`. Both keep a
//! position counter of the bytes actually consumed or written.
//!
//! ```
//! use binary_stream_io::{ByteOrder, SequentialReader, SequentialWriter};
//!
//! let mut w = SequentialWriter::new(ByteOrder::Big);
//! w.write_u32(1234).unwrap();
//! w.write_f64(0.5).unwrap();
//! let bytes = w.into_inner().unwrap();
//!
//! let mut r = SequentialReader::new(&bytes, ByteOrder::Big);
//! let mut tag = [0; 4];
//! r.peek(&mut tag).unwrap();
//! assert_eq!(r.position(), 0);
//! assert_eq!(r.read_u32().unwrap(), 1234);
//! assert_eq!(r.read_f64().unwrap(), 0.5);
//! assert_eq!(r.position(), 12);
//! ```

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

mod error;
mod order;
pub mod reader;
mod state;
pub mod writer;


pub use error::{ReaderError, WriterError};
pub use order::ByteOrder;
pub use reader::SequentialReader;
pub(crate) use state::StreamState;
pub use writer::SequentialWriter;

/// Chunk size used by `SequentialReader::discard` and `SequentialWriter::zero_fill`.
pub const CHUNK_LEN: usize = 1024;
