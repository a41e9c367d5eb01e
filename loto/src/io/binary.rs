//! Primitive field codec for the binary save format.
//!
//! Integers and floats are fixed-width little-endian. Strings and number
//! lists are a `u64` byte count followed by the raw bytes, with no
//! terminator.

use bincode::{
    Decode, Encode,
    config::{self, Config},
};
use chrono::DateTime;
use std::io::{Read, Write};

use super::errors::{Result, SerializationError};
use crate::game::entities::Timestamp;

/// Largest length prefix accepted for a single string or list (16MB).
const MAX_FIELD_SIZE: usize = 16 * 1024 * 1024;

fn field_config() -> impl Config {
    config::legacy().with_limit::<MAX_FIELD_SIZE>()
}

pub fn read_value<T: Decode<()>, R: Read>(reader: &mut R) -> Result<T> {
    Ok(bincode::decode_from_std_read(reader, field_config())?)
}

pub fn write_value<T: Encode, W: Write>(writer: &mut W, value: &T) -> Result<()> {
    bincode::encode_into_std_write(value, writer, field_config())?;
    Ok(())
}

fn read_len<R: Read>(reader: &mut R) -> Result<usize> {
    let len: u64 = read_value(reader)?;
    match usize::try_from(len) {
        Ok(len) if len <= MAX_FIELD_SIZE => Ok(len),
        _ => Err(SerializationError::FieldTooLarge {
            actual: len,
            max: MAX_FIELD_SIZE as u64,
        }),
    }
}

/// Refuses lengths the reader would reject, before anything is written.
fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<()> {
    if len > MAX_FIELD_SIZE {
        return Err(SerializationError::FieldTooLarge {
            actual: len as u64,
            max: MAX_FIELD_SIZE as u64,
        });
    }
    write_value(writer, &(len as u64))
}

pub fn read_bytes<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let len = read_len(reader)?;
    let mut buf = vec![0; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    write_len(writer, bytes.len())?;
    writer.write_all(bytes)?;
    Ok(())
}

pub fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let bytes = read_bytes(reader)?;
    String::from_utf8(bytes)
        .map_err(|error| SerializationError::InvalidFormat(format!("string is not UTF-8: {error}")))
}

pub fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    write_bytes(writer, value.as_bytes())
}

/// Timestamps are stored as nanoseconds since the Unix epoch.
pub fn read_timestamp<R: Read>(reader: &mut R) -> Result<Timestamp> {
    let nanos: i64 = read_value(reader)?;
    Ok(DateTime::from_timestamp_nanos(nanos))
}

pub fn write_timestamp<W: Write>(writer: &mut W, value: &Timestamp) -> Result<()> {
    write_value(writer, &value.timestamp_nanos_opt().unwrap_or(0))
}

/// Reads a count prefix for a list of nested records.
pub fn read_count<R: Read>(reader: &mut R) -> Result<usize> {
    read_len(reader)
}

pub fn write_count<W: Write>(writer: &mut W, count: usize) -> Result<()> {
    write_len(writer, count)
}
