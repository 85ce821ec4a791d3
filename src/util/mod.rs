//! util: общие утилиты для чтения снапшотов.
//!
//! Содержит:
//! - read_at(): seek to an absolute offset and fill the buffer.
//! - trim_name_tag(): fixed-width ASCII variable name -> trimmed String.
//! - ensure_remaining(): header-sized table must fit in what is left of the stream.
//! - read_f64_array(): N little-endian doubles from a record slice.

use anyhow::Result;
use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Seek, SeekFrom};

use crate::error::SnapError;

/// Absolute positioned read. Leaves the stream right after the bytes read.
pub fn read_at<R: Read + Seek + ?Sized>(r: &mut R, offset: u64, buf: &mut [u8]) -> Result<()> {
    r.seek(SeekFrom::Start(offset))?;
    r.read_exact(buf)?;
    Ok(())
}

/// Check that `count` entries of `entry_size` bytes fit between the current
/// position and the end of the stream. The position is left unchanged.
pub fn ensure_remaining<R: Seek + ?Sized>(r: &mut R, count: u64, entry_size: usize) -> Result<()> {
    let pos = r.stream_position()?;
    let end = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(pos))?;
    let available = end.saturating_sub(pos);
    match count.checked_mul(entry_size as u64) {
        Some(needed) if needed <= available => Ok(()),
        needed => Err(SnapError::Truncated {
            needed: needed.unwrap_or(u64::MAX),
            available,
        }
        .into()),
    }
}

/// Name tags are stored as fixed-width ASCII, padded with spaces or NULs
/// on either side. Non-ASCII bytes are replaced, not rejected.
pub fn trim_name_tag(tag: &[u8]) -> String {
    let s = String::from_utf8_lossy(tag);
    s.trim_matches(|c: char| c == '\0' || c.is_ascii_whitespace())
        .to_string()
}

/// Read `N` consecutive LE doubles starting at `buf[0]`.
#[inline]
pub fn read_f64_array<const N: usize>(buf: &[u8]) -> [f64; N] {
    let mut out = [0.0f64; N];
    LittleEndian::read_f64_into(&buf[..N * 8], &mut out);
    out
}

/// Same for LE `i32`.
#[inline]
pub fn read_i32_array<const N: usize>(buf: &[u8]) -> [i32; N] {
    let mut out = [0i32; N];
    LittleEndian::read_i32_into(&buf[..N * 4], &mut out);
    out
}
