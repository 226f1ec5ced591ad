use crate::grib::bits::BitCursor;
use crate::grib::sections::sect5::RepresentationParams;
use crate::grib::utils::sign_magnitude_decode;
use crate::grib::{GribError, Result};

/// Extra descriptors of 5.3 found at the start of the data section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpatialDifferencing {
    pub order: u8,
    pub first: i64,
    pub second: i64,
    pub minimum: i64,
    /// Octets taken by the descriptors
    pub header_len: usize,
}

impl SpatialDifferencing {
    /// Reads the first value(s) and the overall minimum, each on `params[17]`
    /// octets in sign-magnitude form.
    pub(crate) fn read(params: &RepresentationParams, slice: &[u8]) -> Result<Self> {
        let order = params.get(16)?;
        let octets = usize::try_from(params.get(17)?)
            .map_err(|_| GribError::CorruptSection(String::from("Negative spatial differencing descriptor size")))?;

        let order = match order {
            1 | 2 => order as u8,
            n => return Err(GribError::CorruptSection(format!("Spatial differencing of order {}", n))),
        };

        let nbits = octets * 8;
        let mut cursor = BitCursor::new();
        let mut next = || -> Result<i64> { Ok(sign_magnitude_decode(cursor.read(slice, nbits)?, nbits)) };

        let first = next()?;
        let second = if order == 2 { next()? } else { 0 };
        let minimum = next()?;

        Ok(Self {
            order,
            first,
            second,
            minimum,
            header_len: octets * (order as usize + 1),
        })
    }

    /// Undoes the differencing over the non-missing values, in order.
    pub(crate) fn undo<I: Iterator<Item = i64>>(self, iter: I) -> SpatialDiffDecodeIterator<I> {
        SpatialDiffDecodeIterator::new(iter, self)
    }
}

pub(crate) struct SpatialDiffDecodeIterator<I> {
    iter: I,
    spdiff: SpatialDifferencing,
    count: usize,
    prev1: i64,
    prev2: i64,
}

impl<I> SpatialDiffDecodeIterator<I> {
    fn new(iter: I, spdiff: SpatialDifferencing) -> Self {
        Self {
            iter,
            spdiff,
            count: 0,
            prev1: 0,
            prev2: 0,
        }
    }
}

impl<I: Iterator<Item = i64>> Iterator for SpatialDiffDecodeIterator<I> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let count = self.count;
        self.count += 1;

        let v = self.iter.next()?;
        let v = match (self.spdiff.order, count) {
            // the first packed values stand in for the descriptors
            (_, 0) => self.spdiff.first,
            (2, 1) => self.spdiff.second,
            (1, _) => v.wrapping_add(self.spdiff.minimum).wrapping_add(self.prev1),
            (_, _) => v
                .wrapping_add(self.spdiff.minimum)
                .wrapping_add(self.prev1.wrapping_mul(2))
                .wrapping_sub(self.prev2),
        };

        (self.prev2, self.prev1) = (self.prev1, v);
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(order: i64, octets: i64) -> RepresentationParams {
        let mut params = RepresentationParams::for_template(3).unwrap();
        params.set(16, order).unwrap();
        params.set(17, octets).unwrap();
        params
    }

    #[test]
    fn descriptors() {
        let sd = SpatialDifferencing::read(&params(2, 2), &[0, 10, 0x80, 3, 0x80, 1]).unwrap();
        assert_eq!((sd.first, sd.second, sd.minimum, sd.header_len), (10, -3, -1, 6));

        let sd = SpatialDifferencing::read(&params(1, 1), &[5, 2, 0xff]).unwrap();
        assert_eq!((sd.first, sd.minimum, sd.header_len), (5, 2, 2));

        assert!(SpatialDifferencing::read(&params(3, 1), &[0; 8]).is_err());
        assert!(SpatialDifferencing::read(&params(2, 2), &[0; 4]).is_err());
    }

    #[test]
    fn zero_octet_descriptors() {
        let sd = SpatialDifferencing::read(&params(2, 0), &[]).unwrap();
        assert_eq!((sd.first, sd.second, sd.minimum, sd.header_len), (0, 0, 0, 0));
    }

    #[test]
    fn first_order() {
        let sd = SpatialDifferencing { order: 1, first: 10, second: 0, minimum: -2, header_len: 2 };
        // differences 3, 0, 5 after removing the minimum
        let values: Vec<i64> = sd.undo([0, 3, 0, 5].into_iter()).collect();
        assert_eq!(values, [10, 11, 9, 12]);
    }

    #[test]
    fn second_order() {
        let sd = SpatialDifferencing { order: 2, first: 1, second: 4, minimum: 1, header_len: 3 };
        // 1, 4, 9, 16, 25: second differences are all 2
        let values: Vec<i64> = sd.undo([0, 0, 1, 1, 1].into_iter()).collect();
        assert_eq!(values, [1, 4, 9, 16, 25]);
    }
}
