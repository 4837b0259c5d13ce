//! Copies a file through a [`ChunkedStream`]: the whole input is read into the
//! stream in fixed-size blocks, then the stream is drained into the output
//! file.
//!
//! ```text
//! cargo run --example copy_file -- <infile> <outfile>
//! ```
//!
//! Set `RUST_LOG=trace` to watch chunks being allocated and released.
#![allow(missing_docs)]

use std::{
    env,
    fs::File,
    io::{self, Read, Write},
    process::ExitCode,
};

use chunkstream::ChunkedStream;

const BLOCK_LEN: usize = 4096;

fn copy(infile: &str, outfile: &str) -> io::Result<u64> {
    let mut input = File::open(infile)?;
    let mut output = File::create(outfile)?;
    let mut stream = ChunkedStream::new();
    let mut block = [0u8; BLOCK_LEN];

    loop {
        let n = input.read(&mut block)?;
        if n == 0 {
            break;
        }
        stream.write_all(&block[..n])?;
    }
    log::info!(
        "buffered {} bytes in {} chunks",
        stream.len(),
        stream.chunk_count()
    );

    let mut total = 0u64;
    loop {
        let n = stream.read(&mut block);
        if n == 0 {
            break;
        }
        output.write_all(&block[..n])?;
        total += n as u64;
    }
    output.flush()?;
    Ok(total)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let [_, infile, outfile] = args.as_slice() else {
        eprintln!("USAGE: copy_file <infile> <outfile>");
        eprintln!("       Reads from infile to stream, then writes stream to outfile.");
        return ExitCode::FAILURE;
    };

    match copy(infile, outfile) {
        Ok(total) => {
            log::info!("copied {total} bytes");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("copy failed: {err}");
            ExitCode::FAILURE
        }
    }
}
