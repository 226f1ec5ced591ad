use std::marker;
use num::FromPrimitive;
use crate::grib::bits::{extract_field, MAX_FIELD_BITS};

/// Reads a GRIB sign-magnitude integer: the leftmost of `nbits` is the sign.
pub(crate) fn sign_magnitude_decode(raw: u64, nbits: usize) -> i64 {
    if nbits == 0 {
        return 0;
    }
    let sign = 1u64 << (nbits - 1);
    if raw & sign != 0 {
        -((raw & (sign - 1)) as i64)
    } else {
        raw as i64
    }
}

/// Inverse of [`sign_magnitude_decode`]. Magnitudes wider than `nbits - 1` are truncated.
pub(crate) fn sign_magnitude_encode(value: i64, nbits: usize) -> u64 {
    if nbits == 0 {
        return 0;
    }
    let sign = 1u64 << (nbits - 1);
    let magnitude = value.unsigned_abs() & (sign - 1);
    if value < 0 {
        sign | magnitude
    } else {
        magnitude
    }
}

/// Yields consecutive `size`-bit values from a slice, stopping at the first
/// value that would run past its end.
pub(crate) struct BitwiseIterator<'a, T: 'a + FromPrimitive> {
    slice: &'a [u8],
    size: usize,
    offset: usize,
    _marker: marker::PhantomData<T>,
}

impl<'a, T: 'a + FromPrimitive> BitwiseIterator<'a, T> {
    pub(crate) fn new(slice: &'a [u8], size: usize) -> Self {
        Self {
            slice,
            size,
            offset: 0,
            _marker: Default::default()
        }
    }

    pub(crate) fn with_offset(self, offset: usize) -> Self {
        Self {
            offset,
            ..self
        }
    }
}

impl<'a, T: 'a + FromPrimitive> Iterator for BitwiseIterator<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.size > MAX_FIELD_BITS {
            return None;
        }
        let val = extract_field(self.slice, self.offset, self.size).ok()?;
        self.offset += self.size;
        T::from_u64(val)
    }
}
