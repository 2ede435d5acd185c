use crate::ByteOrder;

/// Position and byte order shared by the reader and the writer.
///
/// Both `SequentialReader` and `SequentialWriter` embed one of these. It has no behavior beyond
/// its accessors.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub(crate) struct StreamState {
    position: u64,
    byte_order: Option<ByteOrder>,
}

impl StreamState {
    /// Constructor. The position starts at zero.
    pub fn new(byte_order: impl Into<Option<ByteOrder>>) -> Self {
        Self {
            position: 0,
            byte_order: byte_order.into(),
        }
    }

    /// Number of bytes consumed (reader) or accepted by the sink (writer).
    #[inline(always)]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The active byte order, or `None` if it was never set.
    #[inline(always)]
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    /// Replaces the byte order. This can be done at any point in the stream.
    #[inline(always)]
    pub fn set_byte_order(&mut self, byte_order: impl Into<Option<ByteOrder>>) {
        self.byte_order = byte_order.into();
    }

    #[inline(always)]
    pub(crate) fn advance(&mut self, n: usize) {
        self.position += n as u64;
    }

    pub(crate) fn reset(&mut self, byte_order: Option<ByteOrder>) {
        self.position = 0;
        self.byte_order = byte_order;
    }
}
