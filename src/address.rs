// SPDX-License-Identifier: GPL-3.0-or-later

//! Translates engine memory pointers into buffer offsets, and provides
//! bounds-checked typed reads on top of the translated offset.

use std::io::Cursor;

use binrw::{BinRead, BinResult};
use tracing::trace;

/// A pointer translation or a bounds check failed. Every caller treats this
/// as "prune this edge", never as a hard failure of the whole walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange;

/// Translates a main-space pointer to a buffer offset.
///
/// `main_magic` is `META_MEMORY_OFFSET - index_offset`, precomputed once per pass.
pub(crate) fn translate_main(pointer: u32, main_magic: u32, buffer_len: usize) -> Result<usize, OutOfRange> {
    translate(pointer, main_magic, buffer_len)
}

/// Translates a per-BSP pointer to a buffer offset.
///
/// `file_offset` is where this BSP's payload was copied into the buffer;
/// `bsp_magic` is the pointer value the engine used for byte zero of that payload.
pub(crate) fn translate_bsp(
    pointer: u32,
    bsp_magic: u32,
    file_offset: u32,
    buffer_len: usize,
) -> Result<usize, OutOfRange> {
    let local = pointer.wrapping_sub(bsp_magic);
    let offset = (file_offset as u64).wrapping_add(local as u64);
    if offset >= buffer_len as u64 {
        trace!(pointer, bsp_magic, file_offset, "bsp pointer translated out of range");
        return Err(OutOfRange);
    }
    Ok(offset as usize)
}

fn translate(pointer: u32, magic: u32, buffer_len: usize) -> Result<usize, OutOfRange> {
    let offset = pointer.wrapping_sub(magic);
    if offset as usize >= buffer_len {
        trace!(pointer, magic, "main pointer translated out of range");
        return Err(OutOfRange);
    }
    Ok(offset as usize)
}

/// Reads a single `T` at `offset`, bounds-checking that `offset + size_of::<T>()`
/// stays inside the buffer before attempting the parse.
pub(crate) fn read_struct<T>(buffer: &[u8], offset: usize) -> Option<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let mut cursor = Cursor::new(buffer);
    cursor.set_position(offset as u64);
    let result: BinResult<T> = T::read(&mut cursor);
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            trace!(offset, error = %err, "struct read pruned");
            None
        }
    }
}

/// Reads `count` contiguous `T`s starting at `offset`, checking `count * size_of::<T>()`
/// for overflow and range before parsing.
///
/// Rejects a `count` whose minimum on-disk size (1 byte per element) would
/// already overrun the buffer, so a garbage reflexive can't drive a
/// multi-gigabyte allocation attempt before the per-element bounds check
/// ever gets a chance to run.
pub(crate) fn read_array<T>(buffer: &[u8], offset: usize, count: u32) -> Option<Vec<T>>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    if count == 0 {
        return Some(Vec::new());
    }
    if offset.checked_add(count as usize)? > buffer.len() {
        trace!(offset, count, "array read rejected: declared count exceeds buffer");
        return None;
    }

    let mut cursor = Cursor::new(buffer);
    cursor.set_position(offset as u64);

    let mut items = Vec::with_capacity((count as usize).min(buffer.len()));
    for _ in 0..count {
        match T::read(&mut cursor) {
            Ok(value) => items.push(value),
            Err(err) => {
                trace!(offset, count, error = %err, "array read pruned");
                return None;
            }
        }
    }
    Some(items)
}

/// Patches a little-endian `u32` directly into the buffer at `offset`, if it fits.
pub(crate) fn write_u32_le(buffer: &mut [u8], offset: usize, value: u32) -> Result<(), OutOfRange> {
    let slice = buffer.get_mut(offset..offset + 4).ok_or(OutOfRange)?;
    slice.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_main_basic() {
        // magic = 0x40440000 - index_offset; pointer - magic = index_offset when pointer == META_MEMORY_OFFSET
        let magic = 0x1000;
        assert_eq!(translate_main(0x2000, magic, 0x10000).unwrap(), 0x1000);
    }

    #[test]
    fn translate_main_out_of_range() {
        let magic = 0x1000;
        assert!(translate_main(0x2000, magic, 0x500).is_err());
    }

    #[test]
    fn translate_main_negative_wraps_out_of_range() {
        // pointer below magic wraps to a huge offset, which is out of range.
        assert!(translate_main(0x10, 0x1000, 0x10000).is_err());
    }

    #[test]
    fn translate_bsp_basic() {
        assert_eq!(translate_bsp(0x3000, 0x2000, 0x500, 0x10000).unwrap(), 0x1500);
    }

    #[test]
    fn write_u32_rejects_out_of_range() {
        let mut buffer = vec![0u8; 4];
        assert!(write_u32_le(&mut buffer, 1, 0xdeadbeef).is_err());
    }

    #[test]
    fn write_u32_patches_in_place() {
        let mut buffer = vec![0u8; 8];
        write_u32_le(&mut buffer, 2, 0x04030201).unwrap();
        assert_eq!(&buffer[2..6], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn read_array_rejects_declared_count_larger_than_buffer() {
        let buffer = vec![0u8; 16];
        let result: Option<Vec<u32>> = read_array(&buffer, 0, 0xFFFF_FFFF);
        assert!(result.is_none());
    }

    #[test]
    fn read_array_reads_in_range_elements() {
        let buffer = 10u32.to_le_bytes().into_iter().chain(20u32.to_le_bytes()).collect::<Vec<u8>>();
        let result: Vec<u32> = read_array(&buffer, 0, 2).unwrap();
        assert_eq!(result, vec![10, 20]);
    }
}
