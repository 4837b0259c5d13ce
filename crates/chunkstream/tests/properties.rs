#![allow(missing_docs)]

mod common;

use chunkstream::{Budgeted, ChunkedStream, DEFAULT_CHUNK_SIZE, StreamError, StreamOptions};
use common::{init_logging, pattern};
use rstest::rstest;

const CHUNK: usize = DEFAULT_CHUNK_SIZE;

#[rstest]
#[case::single_write(vec![CHUNK * 2 + 5], 1_000)]
#[case::many_small_writes(vec![3; 2_000], 4_097)]
#[case::mixed_writes(vec![1, CHUNK - 1, 1, CHUNK, 17], 333)]
fn order_is_preserved(#[case] writes: Vec<usize>, #[case] read_len: usize) {
    init_logging();
    let mut stream = ChunkedStream::new();
    let mut expected = Vec::new();
    let mut counter = 0u8;
    for len in writes {
        let data: Vec<u8> = (0..len)
            .map(|_| {
                counter = counter.wrapping_add(1);
                counter
            })
            .collect();
        assert_eq!(stream.write(&data), Ok(len));
        expected.extend_from_slice(&data);
    }

    let mut out = Vec::new();
    let mut buf = vec![0u8; read_len];
    loop {
        let n = stream.read(&mut buf);
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, expected);
}

#[test]
fn size_tracks_written_minus_read() {
    init_logging();
    let mut stream = ChunkedStream::new();
    let mut written = 0;
    let mut read = 0;
    let mut buf = vec![0u8; 1_500];
    for round in 0..20 {
        let data = pattern(round * 700);
        written += stream.write(&data).unwrap();
        read += stream.read(&mut buf[..round * 50]);
        assert_eq!(stream.len(), written - read);
    }
    stream.flush();
    assert_eq!(stream.len(), 0);
}

#[test]
fn peek_is_non_destructive() {
    let mut stream = ChunkedStream::new();
    stream.write(&pattern(CHUNK * 3)).unwrap();
    stream.discard(CHUNK - 7);

    let mut peeked = vec![0u8; 100];
    assert_eq!(stream.peek(&mut peeked), 100);
    for _ in 0..3 {
        let mut again = vec![0u8; 100];
        assert_eq!(stream.peek(&mut again), 100);
        assert_eq!(again, peeked);
    }

    let mut read = vec![0u8; 100];
    assert_eq!(stream.read(&mut read), 100);
    assert_eq!(read, peeked);
}

#[test]
fn round_trip_across_chunk_boundary() {
    init_logging();
    let data = pattern(CHUNK + 10);
    let mut stream =
        ChunkedStream::with_allocator(StreamOptions::default(), Budgeted::new(usize::MAX))
            .unwrap();
    assert_eq!(stream.write(&data), Ok(CHUNK + 10));

    let mut whole = vec![0u8; CHUNK + 10];
    assert_eq!(stream.peek(&mut whole), CHUNK + 10);
    assert_eq!(whole, data);

    let mut first = vec![0u8; CHUNK];
    assert_eq!(stream.read(&mut first), CHUNK);
    assert_eq!(stream.allocator().stats().released, 1);
    assert_eq!(stream.chunk_count(), 1);
    assert_eq!(stream.len(), 10);

    let mut rest = [0u8; 10];
    assert_eq!(stream.read(&mut rest), 10);
    assert_eq!(&rest[..], &data[CHUNK..]);
    assert!(stream.is_empty());
}

#[test]
fn empty_stream_reads_nothing() {
    let mut stream = ChunkedStream::new();
    assert_eq!(stream.read_byte(), Err(StreamError::EmptyStream));
    assert_eq!(stream.read(&mut [0u8; 16]), 0);

    stream.write(b"gone").unwrap();
    stream.flush();
    assert_eq!(stream.read_byte(), Err(StreamError::EmptyStream));
    assert_eq!(stream.read(&mut [0u8; 16]), 0);
}

#[rstest]
#[case::fails_after_one_chunk(1, CHUNK)]
#[case::fails_after_three_chunks(3, 3 * CHUNK)]
fn partial_write_is_reported_and_kept(#[case] limit: usize, #[case] kept: usize) {
    init_logging();
    let data = pattern(10 * CHUNK);
    let mut stream =
        ChunkedStream::with_allocator(StreamOptions::default(), Budgeted::new(limit)).unwrap();
    assert_eq!(stream.write(&data), Ok(kept));
    assert_eq!(stream.len(), kept);

    let mut out = vec![0u8; 10 * CHUNK];
    assert_eq!(stream.read(&mut out), kept);
    assert_eq!(&out[..kept], &data[..kept]);
}

#[test]
fn flush_returns_to_initial_state() {
    let options = StreamOptions { chunk_size: 16 };
    let mut stream = ChunkedStream::with_allocator(options, Budgeted::new(4)).unwrap();
    stream.write(&pattern(40)).unwrap();
    stream.discard(5);
    stream.flush();

    assert_eq!(stream.len(), 0);
    assert_eq!(stream.chunk_count(), 0);
    assert_eq!(stream.allocator().stats().live(), 0);

    // The full budget is available again and the first chunk starts at zero.
    assert_eq!(stream.write(&pattern(64)), Ok(64));
    assert_eq!(stream.chunk_count(), 4);
    let mut out = vec![0u8; 64];
    assert_eq!(stream.read(&mut out), 64);
    assert_eq!(out, pattern(64));
}
