//! Encoding side: [`SequentialWriter`].

use std::io::{self, Write};
use std::mem;

use crate::{ByteOrder, StreamState, WriterError, CHUNK_LEN};

/// Result type for `SequentialWriter`
pub type Result<T> = core::result::Result<T, WriterError>;

/// Writes fixed-width values to a `std::io::Write` sink, using a selectable byte order.
///
/// `position` counts the bytes the sink has accepted. Every `write_*` method keeps calling the
/// sink until the whole value is accepted, so a sink that takes partial writes never truncates
/// the output.
///
/// Like `SequentialReader`, a writer may be *unbound*. Writes of zero bytes succeed in that state;
/// anything else fails with [`WriterError::Unbound`].
pub struct SequentialWriter<W> {
    sink: Option<W>,
    state: StreamState,

    // Zero bytes for `zero_fill`. Allocated on first use.
    zeros: Vec<u8>,
}

impl SequentialWriter<Vec<u8>> {
    /// Creates a new `SequentialWriter` over a `Vec<u8>`
    pub fn new(byte_order: impl Into<Option<ByteOrder>>) -> Self {
        Self::wrap(Vec::new(), byte_order)
    }

    /// Creates a new `SequentialWriter` over a `Vec<u8>` with the given capacity.
    pub fn with_capacity(len: usize, byte_order: impl Into<Option<ByteOrder>>) -> Self {
        Self::wrap(Vec::with_capacity(len), byte_order)
    }
}

impl<W> SequentialWriter<W> {
    /// Constructor
    pub fn wrap(sink: W, byte_order: impl Into<Option<ByteOrder>>) -> Self {
        Self {
            sink: Some(sink),
            state: StreamState::new(byte_order),
            zeros: Vec::new(),
        }
    }

    /// Creates a writer with no sink and no byte order.
    pub fn unbound() -> Self {
        Self {
            sink: None,
            state: StreamState::default(),
            zeros: Vec::new(),
        }
    }

    /// Number of bytes accepted by the sink.
    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.state.position()
    }

    /// The byte order used for multi-byte values.
    #[inline(always)]
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.state.byte_order()
    }

    /// Changes the byte order.
    pub fn set_byte_order(&mut self, byte_order: impl Into<Option<ByteOrder>>) {
        self.state.set_byte_order(byte_order);
    }

    /// Attaches a new sink and byte order, and sets the position back to zero.
    pub fn reset(
        &mut self,
        sink: impl Into<Option<W>>,
        byte_order: impl Into<Option<ByteOrder>>,
    ) {
        log::trace!("writer reset at position {}", self.state.position());
        self.sink = sink.into();
        self.state.reset(byte_order.into());
    }

    /// Accesses the sink
    pub fn get_ref(&self) -> Option<&W> {
        self.sink.as_ref()
    }

    /// Accesses the sink
    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.sink.as_mut()
    }

    /// Extracts the sink
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }
}

impl<W> Default for SequentialWriter<W> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<W: Write> SequentialWriter<W> {
    /// Writes all of `bytes` to the sink.
    ///
    /// On failure, `position` still includes whatever the sink accepted before the error.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let Some(sink) = self.sink.as_mut() else {
            return Err(WriterError::Unbound { op: "write_bytes" });
        };

        let mut written = 0;
        while written < bytes.len() {
            match sink.write(&bytes[written..]) {
                Ok(0) => {
                    return Err(WriterError::WriteZero {
                        requested: bytes.len(),
                        written,
                    })
                }
                Ok(n) => {
                    written += n;
                    self.state.advance(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Writes a small, fixed-size array of bytes.
    #[inline(always)]
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        if self.sink.is_none() {
            return Err(WriterError::Unbound { op: "write_u8" });
        }
        self.write_cbytes([value])
    }

    /// Checks that a typed write can proceed and returns the byte order to encode with.
    #[inline(always)]
    fn order_for(&self, op: &'static str) -> Result<ByteOrder> {
        if self.sink.is_none() {
            return Err(WriterError::Unbound { op });
        }
        self.state
            .byte_order()
            .ok_or(WriterError::ByteOrderNotSet { op })
    }

    /// Writes a single `u16` value in the current byte order
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let order = self.order_for("write_u16")?;
        self.write_cbytes(order.write_u16(value))
    }

    /// Writes a single `u32` value in the current byte order
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let order = self.order_for("write_u32")?;
        self.write_cbytes(order.write_u32(value))
    }

    /// Writes a single `u64` value in the current byte order
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        let order = self.order_for("write_u64")?;
        self.write_cbytes(order.write_u64(value))
    }

    /// Writes a single `i16` value in the current byte order
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        let order = self.order_for("write_i16")?;
        self.write_cbytes(order.write_u16(value as u16))
    }

    /// Writes a single `i32` value in the current byte order
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let order = self.order_for("write_i32")?;
        self.write_cbytes(order.write_u32(value as u32))
    }

    /// Writes a single `i64` value in the current byte order
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        let order = self.order_for("write_i64")?;
        self.write_cbytes(order.write_u64(value as u64))
    }

    /// Writes an `f32` value. The value is encoded using its 4-byte IEEE 754 representation in
    /// the current byte order.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let order = self.order_for("write_f32")?;
        self.write_cbytes(order.write_f32(value))
    }

    /// Writes an `f64` value. The value is encoded using its 8-byte IEEE 754 representation in
    /// the current byte order.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let order = self.order_for("write_f64")?;
        self.write_cbytes(order.write_f64(value))
    }

    /// Writes `n` zero bytes.
    ///
    /// Large fills are written in chunks from a reused buffer. A negative `n` is rejected before
    /// anything is written.
    pub fn zero_fill(&mut self, n: i64) -> Result<()> {
        if n < 0 {
            return Err(WriterError::InvalidLength {
                op: "zero_fill",
                len: n,
            });
        }
        if n == 0 {
            return Ok(());
        }
        if self.sink.is_none() {
            return Err(WriterError::Unbound { op: "zero_fill" });
        }

        let mut zeros = mem::take(&mut self.zeros);
        zeros.resize(CHUNK_LEN, 0);
        let result = self.zero_through(&zeros, n as u64);
        self.zeros = zeros;
        result
    }

    fn zero_through(&mut self, zeros: &[u8], mut n: u64) -> Result<()> {
        while n > 0 {
            let chunk = n.min(zeros.len() as u64) as usize;
            self.write_bytes(&zeros[..chunk])?;
            n -= chunk as u64;
        }
        Ok(())
    }

    /// Flushes the sink.
    pub fn flush(&mut self) -> Result<()> {
        match self.sink.as_mut() {
            Some(sink) => Ok(sink.flush()?),
            None => Err(WriterError::Unbound { op: "flush" }),
        }
    }
}

/// Byte-level access. Each `write` makes one call to the sink and advances `position` by what the
/// sink accepted; use `write_all` (or [`SequentialWriter::write_bytes`]) to send a whole buffer.
impl<W: Write> Write for SequentialWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let Some(sink) = self.sink.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "writer has no sink",
            ));
        };
        let n = sink.write(buf)?;
        self.state.advance(n);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}
