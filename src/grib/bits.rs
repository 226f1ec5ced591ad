//! Arbitrary-width bit fields over a byte buffer.
//!
//! The buffer is treated as one continuous, most-significant-bit-first bit
//! stream. Values are always unsigned here; sign handling is up to callers
//! (see `templates` for the negative-width convention).

use crate::grib::{GribError, Result};

/// Widest field that fits the value type.
pub const MAX_FIELD_BITS: usize = u64::BITS as usize;

fn check_field(len: usize, bit_offset: usize, nbits: usize) -> Result<()> {
    if nbits > MAX_FIELD_BITS {
        return Err(GribError::BitWidthTooLarge(nbits));
    }
    let end = bit_offset.checked_add(nbits);
    if end.map_or(true, |end| end > len * 8) {
        return Err(GribError::OutOfBounds { offset: bit_offset, nbits, len });
    }
    Ok(())
}

/// Reads `nbits` starting at `bit_offset`, right-justified. Never sign-extends.
pub fn extract_field(buf: &[u8], bit_offset: usize, nbits: usize) -> Result<u64> {
    check_field(buf.len(), bit_offset, nbits)?;
    if nbits == 0 {
        return Ok(0);
    }

    let mut index = bit_offset / 8;
    let ibit = bit_offset % 8;
    let mut remaining = nbits;

    // leading byte, possibly partial on both sides
    let take = remaining.min(8 - ibit);
    let mut value = u64::from(buf[index] & (0xff >> ibit)) >> (8 - ibit - take);
    index += 1;
    remaining -= take;

    while remaining >= 8 {
        value = (value << 8) | u64::from(buf[index]);
        index += 1;
        remaining -= 8;
    }

    if remaining > 0 {
        value = (value << remaining) | u64::from(buf[index] >> (8 - remaining));
    }

    Ok(value)
}

/// Extracts `count` fields of `nbits`, advancing `nbits + stride_bits` between them.
pub fn extract_fields(
    buf: &[u8],
    bit_offset: usize,
    nbits: usize,
    stride_bits: usize,
    count: usize,
) -> Result<Vec<u64>> {
    let mut values = crate::grib::try_vec_with_capacity(count)?;
    let mut cursor = BitCursor::at(bit_offset);
    for _ in 0..count {
        values.push(cursor.read(buf, nbits)?);
        cursor.skip(stride_bits);
    }
    Ok(values)
}

/// Writes the low `nbits` of `value` at `bit_offset`.
///
/// Bits of partially covered bytes that lie outside the field are kept.
pub fn insert_field(buf: &mut [u8], value: u64, bit_offset: usize, nbits: usize) -> Result<()> {
    check_field(buf.len(), bit_offset, nbits)?;
    if nbits == 0 {
        return Ok(());
    }

    let mut value = if nbits == MAX_FIELD_BITS { value } else { value & ((1 << nbits) - 1) };
    let last_bit = bit_offset + nbits - 1;
    let mut index = last_bit / 8;
    let ibit = last_bit % 8;
    let mut remaining = nbits;

    // trailing byte, filled from its high end up to `ibit`
    if ibit != 7 {
        let take = remaining.min(ibit + 1);
        let mask = (((1u16 << take) - 1) << (7 - ibit)) as u8;
        let bits = (value << (7 - ibit)) as u8 & mask;
        buf[index] = (buf[index] & !mask) | bits;
        remaining -= take;
        value >>= take;
        if remaining == 0 {
            return Ok(());
        }
        index -= 1;
    }

    while remaining >= 8 {
        buf[index] = value as u8;
        value >>= 8;
        remaining -= 8;
        if remaining == 0 {
            return Ok(());
        }
        index -= 1;
    }

    let mask = ((1u16 << remaining) - 1) as u8;
    buf[index] = (buf[index] & !mask) | (value as u8 & mask);

    Ok(())
}

/// Inserts each of `values` as an `nbits` field, advancing `nbits + stride_bits` between them.
pub fn insert_fields(
    buf: &mut [u8],
    values: &[u64],
    bit_offset: usize,
    nbits: usize,
    stride_bits: usize,
) -> Result<()> {
    let mut cursor = BitCursor::at(bit_offset);
    for value in values {
        cursor.write(buf, *value, nbits)?;
        cursor.skip(stride_bits);
    }
    Ok(())
}

/// Number of octets needed to hold `count` fields of `nbits`.
pub fn octet_length(nbits: usize, count: usize) -> usize {
    (nbits * count + 7) / 8
}

/// A bit position into a buffer the cursor does not own.
///
/// Reads and writes advance the position only when they succeed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitCursor {
    pos: usize,
}

impl BitCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(bit_offset: usize) -> Self {
        Self { pos: bit_offset }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Octet containing the current bit.
    pub fn byte_position(&self) -> usize {
        self.pos / 8
    }

    pub fn set_position(&mut self, bit_offset: usize) {
        self.pos = bit_offset;
    }

    pub fn skip(&mut self, nbits: usize) {
        self.pos += nbits;
    }

    pub fn read(&mut self, buf: &[u8], nbits: usize) -> Result<u64> {
        let value = extract_field(buf, self.pos, nbits)?;
        self.pos += nbits;
        Ok(value)
    }

    pub fn write(&mut self, buf: &mut [u8], value: u64, nbits: usize) -> Result<()> {
        insert_field(buf, value, self.pos, nbits)?;
        self.pos += nbits;
        Ok(())
    }
}
