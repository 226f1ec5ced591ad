//! Linear quantization shared by the simple, JPEG2000 and PNG packers.

use crate::grib::{try_vec_with_capacity, GribError, Result};

/// A field turned into non-negative integers ready for packing.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantized {
    /// Value stored at position 0 of the template, as IEEE single precision
    pub reference: f32,
    pub num_bits: usize,
    /// One integer per point, empty for a constant field
    pub values: Vec<u64>,
}

impl Quantized {
    pub fn is_constant(&self) -> bool {
        self.num_bits == 0
    }
}

/// Quantizes `field` with scale factors `binary_scale_factor` (E) and
/// `decimal_scale_factor` (D), so that each point unpacks as
/// `(reference + n * 2^E) * 10^-D`.
///
/// A constant field packs to zero bits, and its reference is the unscaled
/// field value since unpacking then returns the reference as is.
pub fn quantize(field: &[f64], binary_scale_factor: i32, decimal_scale_factor: i32) -> Result<Quantized> {
    let (min, max) = match min_max(field) {
        Some(bounds) => bounds,
        None => return Ok(constant(0.0)),
    };
    if let Some(v) = field.iter().find(|v| !v.is_finite()) {
        return Err(out_of_range(*v));
    }
    if min == max {
        return Ok(constant(min));
    }

    let bscale = 2_f64.powi(-binary_scale_factor);
    let dscale = 10_f64.powi(decimal_scale_factor);
    let mut values = try_vec_with_capacity(field.len())?;

    let reference = if binary_scale_factor == 0 {
        let imin = to_integer((min * dscale).round())?;
        for v in field {
            let diff = to_integer((v * dscale).round())?
                .checked_sub(imin)
                .ok_or_else(|| out_of_range(*v))?;
            values.push(diff.max(0) as u64);
        }
        imin as f32
    } else {
        let reference = (min * dscale) as f32;
        let scaled_min = f64::from(reference);
        for v in field {
            let n = ((v * dscale - scaled_min) * bscale).round().max(0.0);
            if n.is_nan() || n >= TWO_POW_64 {
                return Err(out_of_range(*v));
            }
            values.push(n as u64);
        }
        reference
    };

    let max_diff = values.iter().copied().max().unwrap_or(0);
    if max_diff == 0 {
        return Ok(constant(min));
    }

    Ok(Quantized {
        reference,
        num_bits: (u64::BITS - max_diff.leading_zeros()) as usize,
        values,
    })
}

/// 2^64, the first integer a packed value cannot hold.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

fn out_of_range(value: f64) -> GribError {
    GribError::EncodeFailure(format!("{} does not quantize to 64 bits", value))
}

/// Converts a rounded value, rejecting anything outside `i64`.
fn to_integer(value: f64) -> Result<i64> {
    if value.is_finite() && value >= i64::MIN as f64 && value < -(i64::MIN as f64) {
        Ok(value as i64)
    } else {
        Err(out_of_range(value))
    }
}

fn constant(value: f64) -> Quantized {
    Quantized {
        reference: value as f32,
        num_bits: 0,
        values: Vec::new(),
    }
}

fn min_max(field: &[f64]) -> Option<(f64, f64)> {
    let first = *field.first()?;
    Some(field.iter().fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))))
}

/// Checks that a `width` x `height` raster holds exactly the field.
pub(crate) fn check_dimensions(field: &[f64], width: usize, height: usize) -> Result<()> {
    if width.checked_mul(height) != Some(field.len()) {
        return Err(GribError::EncodeFailure(format!(
            "{} points do not fill a {}x{} grid",
            field.len(),
            width,
            height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_only() {
        let q = quantize(&[1.0, 2.0, 3.0, 4.0], 0, 0).unwrap();
        assert_eq!(q.reference, 1.0);
        assert_eq!(q.num_bits, 2);
        assert_eq!(q.values, [0, 1, 2, 3]);

        let q = quantize(&[0.25, 0.5, 0.04], 0, 2).unwrap();
        assert_eq!(q.reference, 4.0);
        assert_eq!(q.values, [21, 46, 0]);
        assert_eq!(q.num_bits, 6);
    }

    #[test]
    fn binary_scaling() {
        // steps of 1/4
        let q = quantize(&[10.0, 10.25, 11.0, 12.5], -2, 0).unwrap();
        assert_eq!(q.reference, 10.0);
        assert_eq!(q.values, [0, 1, 4, 10]);
        assert_eq!(q.num_bits, 4);
    }

    #[test]
    fn constant_fields_keep_the_unscaled_value() {
        let q = quantize(&[5.0; 3], 0, 0).unwrap();
        assert!(q.is_constant());
        assert_eq!(q.reference, 5.0);
        assert!(q.values.is_empty());

        let q = quantize(&[2.5; 4], -3, 2).unwrap();
        assert_eq!(q.reference, 2.5);

        // distinct values that quantize to the same integer
        let q = quantize(&[1.0, 1.2], 0, 0).unwrap();
        assert!(q.is_constant());
        assert_eq!(q.reference, 1.0);

        assert_eq!(quantize(&[], 0, 0).unwrap().num_bits, 0);
    }

    #[test]
    fn ranges_past_64_bits_are_rejected() {
        assert!(matches!(quantize(&[-1e19, 1e19], 0, 0), Err(GribError::EncodeFailure(_))));
        assert!(matches!(quantize(&[0.0, 1e25], -1, 0), Err(GribError::EncodeFailure(_))));
        assert!(matches!(quantize(&[0.0, f64::INFINITY], 0, 0), Err(GribError::EncodeFailure(_))));
        assert!(matches!(quantize(&[0.0, f64::NAN], -1, 0), Err(GribError::EncodeFailure(_))));

        // a full 64 bit range still packs
        let q = quantize(&[0.0, 9e18], -1, 0).unwrap();
        assert_eq!(q.num_bits, 64);
    }

    #[test]
    fn grid_dimensions() {
        assert!(check_dimensions(&[0.0; 6], 3, 2).is_ok());
        assert!(matches!(check_dimensions(&[0.0; 6], 4, 2), Err(GribError::EncodeFailure(_))));
        assert!(check_dimensions(&[0.0; 1], usize::MAX, 2).is_err());
    }
}
