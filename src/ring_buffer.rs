use std::fmt;
use std::io;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::RingBufferError;
use crate::DEFAULT_CAPACITY;

/// Cursor state and storage, only ever touched with the lock held.
struct RingBufferInner {
    /// Backing storage, allocated once at construction
    storage: Box<[u8]>,
    /// Next position to read
    read_cursor: usize,
    /// Next position to write
    write_cursor: usize,
    /// Set when the cursors coincide because the buffer is full, not empty
    is_full: bool,
}

impl RingBufferInner {
    fn new(capacity: usize) -> Self {
        RingBufferInner {
            storage: vec![0u8; capacity].into_boxed_slice(),
            read_cursor: 0,
            write_cursor: 0,
            is_full: false,
        }
    }

    fn capacity(&self) -> usize {
        self.storage.len()
    }

    fn is_empty(&self) -> bool {
        !self.is_full && self.write_cursor == self.read_cursor
    }

    /// Number of unread bytes.
    fn occupied(&self) -> usize {
        if self.write_cursor == self.read_cursor {
            if self.is_full {
                self.capacity()
            } else {
                0
            }
        } else if self.write_cursor > self.read_cursor {
            self.write_cursor - self.read_cursor
        } else {
            self.capacity() - self.read_cursor + self.write_cursor
        }
    }

    fn free(&self) -> usize {
        self.capacity() - self.occupied()
    }

    fn read(&mut self, dest: &mut [u8]) -> Result<usize, RingBufferError> {
        if dest.is_empty() {
            return Ok(0);
        }
        if self.is_empty() {
            return Err(RingBufferError::BufferEmpty);
        }

        let capacity = self.capacity();
        let start = self.read_cursor;
        let n = self.occupied().min(dest.len());

        let wrapped = start + n > capacity;
        if wrapped {
            // Unread region crosses the end of storage: tail first, then head
            let c1 = capacity - start;
            dest[..c1].copy_from_slice(&self.storage[start..]);
            dest[c1..n].copy_from_slice(&self.storage[..n - c1]);
        } else {
            dest[..n].copy_from_slice(&self.storage[start..start + n]);
        }

        self.read_cursor = (start + n) % capacity;
        self.is_full = false;
        self.debug_check_invariants();

        trace!(requested = dest.len(), copied = n, wrapped, "ring buffer read");
        Ok(n)
    }

    fn read_byte(&mut self) -> Result<u8, RingBufferError> {
        if self.is_empty() {
            return Err(RingBufferError::BufferEmpty);
        }

        let byte = self.storage[self.read_cursor];
        self.read_cursor += 1;
        if self.read_cursor == self.capacity() {
            self.read_cursor = 0;
        }
        self.is_full = false;
        self.debug_check_invariants();

        Ok(byte)
    }

    fn write(&mut self, src: &[u8]) -> Result<usize, RingBufferError> {
        if src.is_empty() {
            return Ok(0);
        }
        if self.is_full {
            return Err(RingBufferError::BufferFull);
        }

        let capacity = self.capacity();
        let requested = src.len();
        let avail = self.free();
        let truncated = requested > avail;
        if truncated {
            trace!(requested, accepted = avail, "ring buffer write truncated");
        }
        let src = if truncated { &src[..avail] } else { src };
        let n = src.len();

        let mut wrapped = false;
        if self.write_cursor >= self.read_cursor {
            // Free space runs from the write cursor to the end of storage,
            // then from index 0 up to the read cursor.
            let c1 = capacity - self.write_cursor;
            if c1 >= n {
                self.storage[self.write_cursor..self.write_cursor + n].copy_from_slice(src);
                self.write_cursor += n;
            } else {
                wrapped = true;
                self.storage[self.write_cursor..].copy_from_slice(&src[..c1]);
                self.storage[..n - c1].copy_from_slice(&src[c1..]);
                self.write_cursor = n - c1;
            }
        } else {
            // Bounded by the read cursor, so the range cannot wrap.
            self.storage[self.write_cursor..self.write_cursor + n].copy_from_slice(src);
            self.write_cursor += n;
        }

        if self.write_cursor == capacity {
            self.write_cursor = 0;
        }
        if self.write_cursor == self.read_cursor {
            self.is_full = true;
        }
        self.debug_check_invariants();

        trace!(requested, written = n, wrapped, "ring buffer write");
        if truncated {
            Err(RingBufferError::TooMuchData { written: n })
        } else {
            Ok(n)
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), RingBufferError> {
        if self.is_full {
            return Err(RingBufferError::BufferFull);
        }

        self.storage[self.write_cursor] = byte;
        self.write_cursor += 1;
        if self.write_cursor == self.capacity() {
            self.write_cursor = 0;
        }
        if self.write_cursor == self.read_cursor {
            self.is_full = true;
        }
        self.debug_check_invariants();

        Ok(())
    }

    fn peek_all(&self) -> Vec<u8> {
        let n = self.occupied();
        let mut out = Vec::with_capacity(n);
        if n == 0 {
            return out;
        }

        let capacity = self.capacity();
        let start = self.read_cursor;
        if start + n <= capacity {
            out.extend_from_slice(&self.storage[start..start + n]);
        } else {
            let c1 = capacity - start;
            out.extend_from_slice(&self.storage[start..]);
            out.extend_from_slice(&self.storage[..n - c1]);
        }
        out
    }

    fn reset(&mut self) {
        self.read_cursor = 0;
        self.write_cursor = 0;
        self.is_full = false;
    }

    fn debug_check_invariants(&self) {
        debug_assert!(self.read_cursor < self.capacity());
        debug_assert!(self.write_cursor < self.capacity());
        debug_assert!(!self.is_full || self.read_cursor == self.write_cursor);
    }
}

/// Fixed-capacity circular byte buffer
///
/// - Bytes are read back in the order they were written
/// - Capacity never changes after construction
/// - Every operation runs under one exclusive lock and never waits for data or space
///
/// Share it between threads with `Arc<RingBuffer>`.
pub struct RingBuffer {
    inner: Mutex<RingBufferInner>,
    capacity: usize,
}

impl RingBuffer {
    /// Create a new ring buffer holding up to `capacity` bytes
    ///
    /// # Returns
    /// * `Ok(RingBuffer)` with empty storage of the requested size
    /// * `Err(RingBufferError::ZeroCapacity)` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self, RingBufferError> {
        if capacity == 0 {
            return Err(RingBufferError::ZeroCapacity);
        }

        debug!(capacity, "creating ring buffer");
        Ok(RingBuffer {
            inner: Mutex::new(RingBufferInner::new(capacity)),
            capacity,
        })
    }

    /// Read up to `dest.len()` of the oldest unread bytes into `dest`
    ///
    /// Short reads are normal: the returned count may be smaller than
    /// `dest.len()` when fewer bytes are buffered. An empty `dest` returns
    /// `Ok(0)` even when the buffer is empty.
    ///
    /// # Returns
    /// * `Ok(n)` with the number of bytes copied
    /// * `Err(RingBufferError::BufferEmpty)` if nothing is buffered
    pub fn read(&self, dest: &mut [u8]) -> Result<usize, RingBufferError> {
        self.inner.lock().read(dest)
    }

    /// Read a single byte
    pub fn read_byte(&self) -> Result<u8, RingBufferError> {
        self.inner.lock().read_byte()
    }

    /// Append as much of `src` as fits
    ///
    /// When `src` is larger than the free space, the leading bytes that fit
    /// are still stored and the call reports
    /// `RingBufferError::TooMuchData { written }`. The caller owns the rest.
    ///
    /// # Returns
    /// * `Ok(n)` when all of `src` was written
    /// * `Err(RingBufferError::TooMuchData { written })` on a partial write
    /// * `Err(RingBufferError::BufferFull)` if no byte could be written
    pub fn write(&self, src: &[u8]) -> Result<usize, RingBufferError> {
        self.inner.lock().write(src)
    }

    /// Write a single byte, useful for delimiter-framed protocols
    pub fn write_byte(&self, byte: u8) -> Result<(), RingBufferError> {
        self.inner.lock().write_byte(byte)
    }

    /// Write the bytes of `text`, with the same semantics as [`RingBuffer::write`]
    pub fn write_str(&self, text: &str) -> Result<usize, RingBufferError> {
        self.write(text.as_bytes())
    }

    /// Copy out every unread byte without consuming anything
    pub fn peek_all(&self) -> Vec<u8> {
        self.inner.lock().peek_all()
    }

    /// Number of unread bytes
    pub fn len(&self) -> usize {
        self.inner.lock().occupied()
    }

    /// Total size of the backing storage in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes that can be written before the buffer is full
    pub fn free(&self) -> usize {
        self.inner.lock().free()
    }

    /// Check whether every byte of storage holds unread data
    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full
    }

    /// Check whether there is nothing to read
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Discard all buffered bytes and rewind both cursors to the start
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        let discarded = inner.occupied();
        inner.reset();
        debug!(discarded, "ring buffer reset");
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        RingBuffer {
            inner: Mutex::new(RingBufferInner::new(DEFAULT_CAPACITY)),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity)
            .field("len", &inner.occupied())
            .field("is_full", &inner.is_full)
            .finish()
    }
}

/// Empty buffers report `WouldBlock` rather than `Ok(0)`, which would read as EOF.
impl io::Read for &RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        RingBuffer::read(*self, buf).map_err(io::Error::from)
    }
}

/// Short writes follow the `io::Write` contract and return `Ok(n)`.
impl io::Write for &RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match RingBuffer::write(*self, buf) {
            Ok(n) => Ok(n),
            Err(RingBufferError::TooMuchData { written }) => Ok(written),
            Err(err) => Err(err.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut &*self, buf)
    }
}

impl io::Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
