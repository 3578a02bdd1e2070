//! Minimal RESP reply reader.
//!
//! Only the reply side of the protocol is implemented; commands are sent
//! in the inline form (`GET testkey\r\n`), which every RESP server
//! accepts. A null bulk string or null array decodes to `None`; an
//! absent reply is not an error at this layer.

use std::io::{self, BufRead, Read};

/// One decoded server reply.
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Vec<u8>),
    Array(Vec<RespValue>),
}

/// Reads one reply from the server.
///
/// Returns `Ok(None)` for a null bulk string (`$-1`) or null array
/// (`*-1`). An `-ERR ...` reply is still a reply and decodes to
/// `RespValue::Error`; only malformed or truncated input produces an
/// `io::Error`.
pub fn read_reply<R: BufRead>(reader: &mut R) -> io::Result<Option<RespValue>> {
    let line = read_line(reader)?;
    let prefix = *line
        .as_bytes()
        .first()
        .ok_or_else(|| malformed("empty reply line"))?;
    // All recognized prefixes are ASCII, so the slice below is safe for
    // every line that reaches its arm.
    let rest = line.get(1..).unwrap_or_default();

    match prefix {
        b'+' => Ok(Some(RespValue::Simple(rest.to_string()))),
        b'-' => Ok(Some(RespValue::Error(rest.to_string()))),
        b':' => {
            let value = rest
                .parse::<i64>()
                .map_err(|_| malformed("invalid integer reply"))?;
            Ok(Some(RespValue::Integer(value)))
        }
        b'$' => {
            let len = parse_length(rest)?;
            match len {
                None => Ok(None),
                Some(len) => {
                    let mut payload = vec![0u8; len];
                    reader.read_exact(&mut payload)?;
                    consume_crlf(reader)?;
                    Ok(Some(RespValue::Bulk(payload)))
                }
            }
        }
        b'*' => {
            let len = parse_length(rest)?;
            match len {
                None => Ok(None),
                Some(len) => {
                    let mut items = Vec::with_capacity(len);
                    for _ in 0..len {
                        // Null elements inside an array are represented as
                        // empty bulk values; the driver never looks inside.
                        let item = read_reply(reader)?.unwrap_or(RespValue::Bulk(Vec::new()));
                        items.push(item);
                    }
                    Ok(Some(RespValue::Array(items)))
                }
            }
        }
        other => Err(malformed(format!("unexpected reply prefix 0x{other:02x}"))),
    }
}

/// Parses a bulk/array length header; `-1` means a null value.
fn parse_length(digits: &str) -> io::Result<Option<usize>> {
    if digits == "-1" {
        return Ok(None);
    }
    let len = digits
        .parse::<usize>()
        .map_err(|_| malformed("invalid length header"))?;
    Ok(Some(len))
}

/// Reads one CRLF-terminated line, without the terminator.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed mid-reply",
        ));
    }
    if !line.ends_with("\r\n") {
        return Err(malformed("reply line not CRLF-terminated"));
    }
    line.truncate(line.len() - 2);
    Ok(line)
}

fn consume_crlf<R: Read>(reader: &mut R) -> io::Result<()> {
    let mut crlf = [0u8; 2];
    reader.read_exact(&mut crlf)?;
    if &crlf != b"\r\n" {
        return Err(malformed("bulk payload not CRLF-terminated"));
    }
    Ok(())
}

fn malformed(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}
