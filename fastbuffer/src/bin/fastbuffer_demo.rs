//! FastBuffer CLI Demo
//!
//! Reads lines from stdin into a buffer and prints what it holds.
//! The buffer is configured from the JSON in `FASTBUFFER_CONFIG`, if set.
//! Run with `RUST_LOG=trace` to see every reallocation.

use fastbuffer::{BufferConfig, FastBuffer};
use std::io::{self, BufRead};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::var("FASTBUFFER_CONFIG") {
        Ok(json) => BufferConfig::from_json_str(&json)?,
        Err(_) => BufferConfig::default(),
    };
    let mut buffer = FastBuffer::from_config(&config)?;

    println!("Enter text (empty line to quit):");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        buffer.append(trimmed.to_string())?;
    }

    println!(
        "{} line(s) buffered, capacity {}",
        buffer.len(),
        buffer.capacity()
    );
    for (i, line) in buffer.iter().enumerate() {
        println!("{i:>4}: {line}");
    }
    Ok(())
}
