//! Throwaway mock key-value server for local runs.
//!
//! ```text
//! cargo run --example mock_server
//! cargo run --bin kvsurge -- 127.0.0.1 7379 100 4
//! ```
//!
//! Answers every inline command with a fixed bulk reply and closes.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:7379")?;
    println!("Mock KV server listening on {}", listener.local_addr()?);

    for stream in listener.incoming() {
        let mut stream = match stream {
            Ok(stream) => stream,
            Err(_) => continue,
        };
        thread::spawn(move || {
            let mut buf = [0u8; 256];
            if matches!(stream.read(&mut buf), Ok(n) if n > 0) {
                let _ = stream.write_all(b"$7\r\ntestval\r\n");
            }
        });
    }
    Ok(())
}
