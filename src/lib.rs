//! # bytering - locked fixed-capacity byte ring buffer
//!
//! A bounded FIFO byte channel over a single pre-allocated block of memory.
//!
//! ## Design
//!
//! - Capacity is fixed at construction; the buffer never grows
//! - Read and write cursors plus an `is_full` flag, so every byte of storage is usable
//! - Reads and writes that straddle the end of storage are split into two copies
//! - One `parking_lot::Mutex` serializes every operation; nothing blocks waiting for data or space
//! - Bulk writes larger than the free space store the prefix that fits and report
//!   [`RingBufferError::TooMuchData`] with the accepted count
//!
//! ## Example
//!
//! ```
//! use bytering::{RingBuffer, RingBufferError};
//!
//! let rb = RingBuffer::new(8).unwrap();
//!
//! // Producer
//! assert_eq!(rb.write(b"hello").unwrap(), 5);
//! assert_eq!(
//!     rb.write_str("world"),
//!     Err(RingBufferError::TooMuchData { written: 3 })
//! );
//! assert!(rb.is_full());
//!
//! // Consumer
//! let mut buf = [0u8; 16];
//! let n = rb.read(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"hellowor");
//! assert_eq!(rb.read(&mut buf), Err(RingBufferError::BufferEmpty));
//! ```

#![warn(missing_docs)]

mod error;
mod ring_buffer;

pub use error::RingBufferError;
pub use ring_buffer::RingBuffer;

/// Capacity used by `RingBuffer::default()`
pub const DEFAULT_CAPACITY: usize = 4096;
