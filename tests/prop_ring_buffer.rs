use std::collections::VecDeque;

use bytering::{RingBuffer, RingBufferError};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Write(Vec<u8>),
    WriteByte(u8),
    Read(usize),
    ReadByte,
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..24).prop_map(Op::Write),
        2 => any::<u8>().prop_map(Op::WriteByte),
        4 => (0usize..24).prop_map(Op::Read),
        2 => Just(Op::ReadByte),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_matches_vecdeque_model(
        capacity in 1usize..20,
        ops in prop::collection::vec(op_strategy(), 0..64)
    ) {
        let rb = RingBuffer::new(capacity).unwrap();
        let mut model: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                Op::Write(data) => {
                    let free = capacity - model.len();
                    let result = rb.write(&data);
                    if data.is_empty() {
                        prop_assert_eq!(result, Ok(0));
                    } else if free == 0 {
                        prop_assert_eq!(result, Err(RingBufferError::BufferFull));
                    } else if data.len() > free {
                        prop_assert_eq!(result, Err(RingBufferError::TooMuchData { written: free }));
                        model.extend(&data[..free]);
                    } else {
                        prop_assert_eq!(result, Ok(data.len()));
                        model.extend(&data);
                    }
                }
                Op::WriteByte(b) => {
                    let result = rb.write_byte(b);
                    if model.len() == capacity {
                        prop_assert_eq!(result, Err(RingBufferError::BufferFull));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        model.push_back(b);
                    }
                }
                Op::Read(len) => {
                    let mut buf = vec![0u8; len];
                    let result = rb.read(&mut buf);
                    if len == 0 {
                        prop_assert_eq!(result, Ok(0));
                    } else if model.is_empty() {
                        prop_assert_eq!(result, Err(RingBufferError::BufferEmpty));
                    } else {
                        let n = len.min(model.len());
                        prop_assert_eq!(result, Ok(n));
                        let expected: Vec<u8> = model.drain(..n).collect();
                        prop_assert_eq!(&buf[..n], &expected[..]);
                    }
                }
                Op::ReadByte => {
                    match model.pop_front() {
                        Some(b) => {
                            prop_assert_eq!(rb.read_byte(), Ok(b));
                        }
                        None => {
                            prop_assert_eq!(rb.read_byte(), Err(RingBufferError::BufferEmpty));
                        }
                    }
                }
                Op::Reset => {
                    rb.reset();
                    model.clear();
                }
            }

            prop_assert_eq!(rb.len(), model.len());
            prop_assert_eq!(rb.len() + rb.free(), rb.capacity());
            prop_assert_eq!(rb.is_full(), model.len() == capacity);
            prop_assert_eq!(rb.is_empty(), model.is_empty());
            let expected: Vec<u8> = model.iter().copied().collect();
            prop_assert_eq!(rb.peek_all(), expected);
        }
    }

    #[test]
    fn prop_roundtrip_after_wrapping(
        capacity in 1usize..64,
        offset in 0usize..64,
        data in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        let rb = RingBuffer::new(capacity).unwrap();

        // Move both cursors away from zero
        let shift = offset % capacity;
        if shift > 0 {
            rb.write(&vec![0u8; shift]).unwrap();
            let mut sink = vec![0u8; shift];
            prop_assert_eq!(rb.read(&mut sink), Ok(shift));
        }

        let k = data.len().min(capacity);
        prop_assert_eq!(rb.write(&data[..k]), Ok(k));
        let mut out = vec![0u8; k];
        if k > 0 {
            prop_assert_eq!(rb.read(&mut out), Ok(k));
        }
        prop_assert_eq!(&out[..], &data[..k]);
        prop_assert!(rb.is_empty());
    }
}
