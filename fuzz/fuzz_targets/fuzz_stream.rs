#![no_main]
use std::collections::VecDeque;

use arbitrary::Arbitrary;
use chunkstream::{Budgeted, ChunkedStream, StreamError, StreamOptions};
use libfuzzer_sys::fuzz_target;

/// Chunk sizes stay small so short inputs cross many chunk boundaries.
const MAX_CHUNK_SIZE: usize = 64;

#[derive(Arbitrary, Debug)]
enum Op {
    Write(Vec<u8>),
    WriteByte(u8),
    Read(u16),
    ReadByte,
    Peek(u16),
    Discard(u16),
    Flush,
    SetBudget(u8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    chunk_size: u8,
    budget: Option<u8>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let chunk_size = 1 + usize::from(input.chunk_size) % MAX_CHUNK_SIZE;
    let limit = input.budget.map_or(usize::MAX, usize::from);
    let mut stream =
        ChunkedStream::with_allocator(StreamOptions { chunk_size }, Budgeted::new(limit))
            .expect("chunk size is non-zero");
    let mut model = VecDeque::<u8>::new();

    for op in input.ops {
        match op {
            Op::Write(data) => match stream.write(&data) {
                Ok(n) => model.extend(&data[..n]),
                Err(StreamError::Allocation(_)) => assert!(!data.is_empty()),
                Err(err) => panic!("unexpected write error: {err}"),
            },
            Op::WriteByte(byte) => {
                if stream.write_byte(byte).is_ok() {
                    model.push_back(byte);
                }
            }
            Op::Read(len) => {
                let mut buf = vec![0u8; usize::from(len)];
                let n = stream.read(&mut buf);
                assert_eq!(n, buf.len().min(model.len()));
                assert!(buf[..n].iter().eq(model.drain(..n).collect::<Vec<_>>().iter()));
            }
            Op::ReadByte => assert_eq!(stream.read_byte().ok(), model.pop_front()),
            Op::Peek(len) => {
                let mut buf = vec![0u8; usize::from(len)];
                let n = stream.peek(&mut buf);
                assert_eq!(n, buf.len().min(model.len()));
                assert!(buf[..n].iter().eq(model.iter().take(n)));
            }
            Op::Discard(len) => {
                let n = stream.discard(usize::from(len));
                assert_eq!(n, usize::from(len).min(model.len()));
                model.drain(..n);
            }
            Op::Flush => {
                stream.flush();
                model.clear();
            }
            Op::SetBudget(limit) => stream.allocator_mut().set_limit(usize::from(limit)),
        }

        assert_eq!(stream.len(), model.len());
        assert!(stream.segments().flatten().eq(model.iter()));
        assert_eq!(stream.allocator().stats().live(), stream.chunk_count());
    }
});
