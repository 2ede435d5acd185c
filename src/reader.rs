//! Decoding side: [`SequentialReader`] and its lookahead buffer.

use std::io::{self, Read};
use std::mem;

use crate::{ByteOrder, ReaderError, StreamState, CHUNK_LEN};

/// Result type for `SequentialReader`
pub type Result<T> = core::result::Result<T, ReaderError>;

/// Initial size of the lookahead buffer.
const DEFAULT_PEEK_CAPACITY: usize = 64;

/// The lookahead buffer never grows by less than this, so a run of small peeks does not
/// reallocate on every call.
const PEEK_GROWTH: usize = 64;

/// Reads fixed-width values from a `std::io::Read` source, using a selectable byte order.
///
/// The reader keeps a running count of the bytes it has consumed (`position`). It also supports
/// lookahead through [`peek`](Self::peek): peeked bytes are kept in an internal buffer and are
/// handed out by later reads before the source is touched again. Peeking never changes
/// `position`.
///
/// A reader can be *unbound*, meaning it has no source. Every operation that needs data fails
/// with [`ReaderError::Unbound`] in that state. Zero-length requests are the exception; they
/// always succeed without looking at the source.
///
/// The reader is not internally synchronized. It is meant to be owned by one thread at a time.
pub struct SequentialReader<R> {
    source: Option<R>,
    state: StreamState,

    // Bytes in `peek_buf[peek_consumed..peek_filled]` were fetched by `peek` and have not yet
    // been handed to a read. They must be delivered before the source is read again.
    peek_buf: Vec<u8>,
    peek_filled: usize,
    peek_consumed: usize,

    // Reused by `discard`. Allocated on first use.
    scratch: Vec<u8>,
}

impl<'a> SequentialReader<&'a [u8]> {
    /// Creates a reader over a slice of bytes.
    pub fn new(data: &'a [u8], byte_order: impl Into<Option<ByteOrder>>) -> Self {
        Self::wrap(data, byte_order)
    }
}

impl<R> SequentialReader<R> {
    /// Constructor
    pub fn wrap(source: R, byte_order: impl Into<Option<ByteOrder>>) -> Self {
        Self::with_peek_capacity(source, byte_order, DEFAULT_PEEK_CAPACITY)
    }

    /// Creates a reader whose lookahead buffer starts out holding `capacity` bytes.
    pub fn with_peek_capacity(
        source: R,
        byte_order: impl Into<Option<ByteOrder>>,
        capacity: usize,
    ) -> Self {
        Self {
            source: Some(source),
            state: StreamState::new(byte_order),
            peek_buf: vec![0; capacity],
            peek_filled: 0,
            peek_consumed: 0,
            scratch: Vec::new(),
        }
    }

    /// Creates a reader with no source and no byte order. Use [`reset`](Self::reset) to attach
    /// one.
    pub fn unbound() -> Self {
        Self {
            source: None,
            state: StreamState::default(),
            peek_buf: Vec::new(),
            peek_filled: 0,
            peek_consumed: 0,
            scratch: Vec::new(),
        }
    }

    /// Number of bytes consumed so far. Peeked bytes are not counted until they are read.
    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.state.position()
    }

    /// The byte order used for multi-byte values.
    #[inline(always)]
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.state.byte_order()
    }

    /// Changes the byte order. This does not affect bytes that have already been peeked; they are
    /// decoded with whatever byte order is active when they are read.
    pub fn set_byte_order(&mut self, byte_order: impl Into<Option<ByteOrder>>) {
        self.state.set_byte_order(byte_order);
    }

    /// Number of bytes that have been peeked but not yet read.
    #[inline(always)]
    pub fn peeked_len(&self) -> usize {
        self.peek_filled - self.peek_consumed
    }

    /// Attaches a new source and byte order. The position goes back to zero and any peeked bytes
    /// from the previous source are dropped.
    pub fn reset(
        &mut self,
        source: impl Into<Option<R>>,
        byte_order: impl Into<Option<ByteOrder>>,
    ) {
        log::trace!(
            "reader reset at position {} with {} peeked bytes pending",
            self.state.position(),
            self.peeked_len()
        );
        self.source = source.into();
        self.state.reset(byte_order.into());
        self.peek_filled = 0;
        self.peek_consumed = 0;
    }

    /// Accesses the source
    pub fn get_ref(&self) -> Option<&R> {
        self.source.as_ref()
    }

    /// Accesses the source. Reading from it directly bypasses the position counter and the
    /// lookahead buffer.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.source.as_mut()
    }

    /// Extracts the source. Any peeked bytes that were not read are lost.
    pub fn into_inner(self) -> Option<R> {
        self.source
    }
}

impl<R> Default for SequentialReader<R> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<R: Read> SequentialReader<R> {
    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        if self.source.is_none() {
            return Err(ReaderError::Unbound { op: "read_u8" });
        }
        let [b] = self.read_cbytes::<1>()?;
        Ok(b)
    }

    /// Fills `dst` completely.
    ///
    /// Peeked bytes are used first, then the source is read as many times as needed. If the
    /// source runs out first, this returns [`ReaderError::UnexpectedEof`]; the bytes that were
    /// obtained are still counted as consumed.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.is_empty() {
            return Ok(());
        }
        let Some(source) = self.source.as_mut() else {
            return Err(ReaderError::Unbound { op: "read_bytes" });
        };

        let pending = self.peek_filled - self.peek_consumed;
        if pending >= dst.len() {
            let start = self.peek_consumed;
            dst.copy_from_slice(&self.peek_buf[start..start + dst.len()]);
            self.peek_consumed += dst.len();
            self.state.advance(dst.len());
            return Ok(());
        }

        // Drain whatever was peeked (possibly nothing) and read the rest straight into `dst`.
        let (head, tail) = dst.split_at_mut(pending);
        head.copy_from_slice(&self.peek_buf[self.peek_consumed..self.peek_filled]);
        self.peek_consumed = self.peek_filled;

        let (n, result) = fill_from(source, tail, pending);
        self.state.advance(pending + n);
        result
    }

    /// Reads `len` bytes into a new `Vec<u8>`.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut v = vec![0; len];
        self.read_bytes(&mut v)?;
        Ok(v)
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0; N];
        self.read_bytes(&mut buf)?;
        Ok(buf)
    }

    /// Checks that a typed read can proceed, then reads its bytes.
    #[inline(always)]
    fn read_ordered<const N: usize>(&mut self, op: &'static str) -> Result<(ByteOrder, [u8; N])> {
        if self.source.is_none() {
            return Err(ReaderError::Unbound { op });
        }
        let Some(order) = self.state.byte_order() else {
            return Err(ReaderError::ByteOrderNotSet { op });
        };
        Ok((order, self.read_cbytes()?))
    }

    /// Reads a `u16` in the current byte order.
    pub fn read_u16(&mut self) -> Result<u16> {
        let (order, bytes) = self.read_ordered::<2>("read_u16")?;
        Ok(order.read_u16(bytes))
    }

    /// Reads a `u32` in the current byte order.
    pub fn read_u32(&mut self) -> Result<u32> {
        let (order, bytes) = self.read_ordered::<4>("read_u32")?;
        Ok(order.read_u32(bytes))
    }

    /// Reads a `u64` in the current byte order.
    pub fn read_u64(&mut self) -> Result<u64> {
        let (order, bytes) = self.read_ordered::<8>("read_u64")?;
        Ok(order.read_u64(bytes))
    }

    /// Reads a `i16` in the current byte order.
    pub fn read_i16(&mut self) -> Result<i16> {
        let (order, bytes) = self.read_ordered::<2>("read_i16")?;
        Ok(order.read_u16(bytes) as i16)
    }

    /// Reads a `i32` in the current byte order.
    pub fn read_i32(&mut self) -> Result<i32> {
        let (order, bytes) = self.read_ordered::<4>("read_i32")?;
        Ok(order.read_u32(bytes) as i32)
    }

    /// Reads a `i64` in the current byte order.
    pub fn read_i64(&mut self) -> Result<i64> {
        let (order, bytes) = self.read_ordered::<8>("read_i64")?;
        Ok(order.read_u64(bytes) as i64)
    }

    /// Reads an IEEE 754 `f32` in the current byte order. The bit pattern is taken as-is; NaN and
    /// infinity are not treated specially.
    pub fn read_f32(&mut self) -> Result<f32> {
        let (order, bytes) = self.read_ordered::<4>("read_f32")?;
        Ok(order.read_f32(bytes))
    }

    /// Reads an IEEE 754 `f64` in the current byte order. The bit pattern is taken as-is; NaN and
    /// infinity are not treated specially.
    pub fn read_f64(&mut self) -> Result<f64> {
        let (order, bytes) = self.read_ordered::<8>("read_f64")?;
        Ok(order.read_f64(bytes))
    }

    /// Consumes and drops `n` bytes.
    ///
    /// The bytes pass through a fixed-size scratch buffer, so memory use does not depend on `n`.
    /// If the source runs out, the `UnexpectedEof` error describes the chunk that failed, not the
    /// whole request; `position` tells how far the reader got.
    pub fn discard(&mut self, n: u64) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        if self.source.is_none() {
            return Err(ReaderError::Unbound { op: "discard" });
        }

        let mut scratch = mem::take(&mut self.scratch);
        scratch.resize(CHUNK_LEN, 0);
        let result = self.discard_through(&mut scratch, n);
        self.scratch = scratch;
        result
    }

    fn discard_through(&mut self, scratch: &mut [u8], mut n: u64) -> Result<()> {
        while n > 0 {
            let chunk = n.min(scratch.len() as u64) as usize;
            self.read_bytes(&mut scratch[..chunk])?;
            n -= chunk as u64;
        }
        Ok(())
    }

    /// Fills `dst` with the next `dst.len()` bytes without consuming them.
    ///
    /// Peeks accumulate: a longer peek extends the window fetched by an earlier one, and a shorter
    /// one returns a prefix of it. Until a read consumes some of the window, every peek sees the
    /// same bytes. `position` never changes.
    ///
    /// If the source runs out, this returns [`ReaderError::UnexpectedEof`] and the bytes that were
    /// already peeked stay available.
    pub fn peek(&mut self, dst: &mut [u8]) -> Result<()> {
        if dst.is_empty() {
            return Ok(());
        }
        let Some(source) = self.source.as_mut() else {
            return Err(ReaderError::Unbound { op: "peek" });
        };

        let pending = self.peek_filled - self.peek_consumed;
        if pending == 0 {
            self.peek_filled = 0;
            self.peek_consumed = 0;
        }

        if pending >= dst.len() {
            let start = self.peek_consumed;
            dst.copy_from_slice(&self.peek_buf[start..start + dst.len()]);
            return Ok(());
        }

        let need = dst.len() - pending;
        let mut end = self.peek_filled + need;
        if end > self.peek_buf.len() && self.peek_consumed > 0 {
            // Slide the pending bytes to the front before considering growth.
            self.peek_buf
                .copy_within(self.peek_consumed..self.peek_filled, 0);
            self.peek_filled = pending;
            self.peek_consumed = 0;
            end = dst.len();
        }
        if end > self.peek_buf.len() {
            let old_len = self.peek_buf.len();
            let grow = (end - old_len).max(PEEK_GROWTH);
            self.peek_buf.resize(old_len + grow, 0);
            log::trace!(
                "peek buffer grown from {} to {} bytes",
                old_len,
                self.peek_buf.len()
            );
        }

        // `peek_filled` only moves once the whole window is in, so a failure here leaves the
        // pending bytes as they were.
        let (_, result) = fill_from(source, &mut self.peek_buf[self.peek_filled..end], pending);
        result?;

        dst.copy_from_slice(&self.peek_buf[self.peek_consumed..end]);
        self.peek_filled = end;
        Ok(())
    }
}

/// Reads from `source` until `dst` is full.
///
/// Returns the number of bytes placed in `dst`, even on failure. `already` is the number of bytes
/// the caller has delivered for this request from elsewhere; it only affects the error report.
fn fill_from<R: Read>(source: &mut R, dst: &mut [u8], already: usize) -> (usize, Result<()>) {
    let mut filled = 0;
    while filled < dst.len() {
        match source.read(&mut dst[filled..]) {
            Ok(0) => {
                let err = ReaderError::UnexpectedEof {
                    requested: already + dst.len(),
                    read: already + filled,
                };
                return (filled, Err(err));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return (filled, Err(e.into())),
        }
    }
    (filled, Ok(()))
}

/// Byte-level access. Peeked bytes are returned first; after that, each call makes at most one
/// call to the source. `position` advances by the number of bytes returned.
impl<R: Read> Read for SequentialReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let Some(source) = self.source.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "reader has no source",
            ));
        };

        let pending = self.peek_filled - self.peek_consumed;
        let n = if pending > 0 {
            let n = pending.min(buf.len());
            let start = self.peek_consumed;
            buf[..n].copy_from_slice(&self.peek_buf[start..start + n]);
            self.peek_consumed += n;
            n
        } else {
            source.read(buf)?
        };

        self.state.advance(n);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_window_rewinds_once_drained() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut r = SequentialReader::new(&data, ByteOrder::Little);
        let mut window = [0u8; 48];
        for chunk in data.chunks(48) {
            let window = &mut window[..chunk.len()];
            r.peek(window).unwrap();
            assert_eq!(window, chunk);
            r.read_bytes(window).unwrap();
        }
        assert_eq!(r.position(), data.len() as u64);
        assert_eq!(r.peek_buf.len(), DEFAULT_PEEK_CAPACITY);
    }

    #[test]
    fn sliding_peek_window_stays_bounded() {
        let data: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
        let mut r = SequentialReader::new(&data, ByteOrder::Little);
        let mut window = [0u8; 2];
        let mut one = [0u8; 1];
        for i in 0..data.len() - 1 {
            r.peek(&mut window).unwrap();
            assert_eq!(window, data[i..i + 2], "i = {i}");
            r.read_bytes(&mut one).unwrap();
            assert_eq!(one[0], data[i]);
            assert_eq!(r.peeked_len(), 1);
        }
        assert_eq!(r.position(), data.len() as u64 - 1);
        assert_eq!(r.peek_buf.len(), DEFAULT_PEEK_CAPACITY);
        assert_eq!(r.read_u8().unwrap(), data[data.len() - 1]);
    }

    #[test]
    fn slide_keeps_window_across_growth() {
        let data: Vec<u8> = (0..200u8).collect();
        let mut r = SequentialReader::with_peek_capacity(&data[..], ByteOrder::Big, 8);
        let mut head = [0u8; 6];
        r.peek(&mut head).unwrap();
        r.discard(5).unwrap();

        // One byte pending at offset 5; the wider peek must slide it and then grow.
        let mut wide = [0u8; 20];
        r.peek(&mut wide).unwrap();
        assert_eq!(wide[..], data[5..25]);
        assert_eq!(r.peek_buf.len(), 8 + PEEK_GROWTH);
        assert_eq!(r.read_vec(20).unwrap(), data[5..25]);
        assert_eq!(r.position(), 25);
    }

    #[test]
    fn small_peeks_grow_by_minimum_step() {
        let data = [7u8; 256];
        let mut r = SequentialReader::with_peek_capacity(&data[..], ByteOrder::Big, 0);
        let mut one = [0u8; 1];
        r.peek(&mut one).unwrap();
        assert_eq!(r.peek_buf.len(), PEEK_GROWTH);

        let mut more = [0u8; PEEK_GROWTH + 1];
        r.peek(&mut more).unwrap();
        assert_eq!(r.peek_buf.len(), 2 * PEEK_GROWTH);
        assert_eq!(r.peeked_len(), PEEK_GROWTH + 1);
    }
}
