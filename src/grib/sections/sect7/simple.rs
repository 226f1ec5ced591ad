use num::ToPrimitive;
use crate::grib::bits::{insert_fields, octet_length};
use crate::grib::sections::sect5::{DataRepresentationDefinition, RepresentationParams};
use crate::grib::sections::sect7::scaling::quantize;
use crate::grib::sections::sect7::{Grib2DataDecoder, Grib2DataEncoder};
use crate::grib::utils::BitwiseIterator;
use crate::grib::{try_vec_with_capacity, try_zeroed, GribError, Result};

/// Inverse of the linear quantization: `(reference + n * 2^E) * 10^-D`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scaling {
    pub(crate) reference_value: f64,
    binary_scale: f64,
    decimal_scale: f64,
}

impl Scaling {
    pub(crate) fn new(reference_value: f32, binary_scale_factor: i32, decimal_scale_factor: i32) -> Self {
        Self {
            reference_value: f64::from(reference_value),
            binary_scale: 2_f64.powi(binary_scale_factor),
            decimal_scale: 10_f64.powi(-decimal_scale_factor),
        }
    }

    pub(crate) fn from_params(params: &RepresentationParams) -> Result<Self> {
        Ok(Self::new(
            params.reference_value()?,
            params.binary_scale_factor()?,
            params.decimal_scale_factor()?,
        ))
    }

    pub(crate) fn apply(&self, encoded: f64) -> f64 {
        (self.reference_value + encoded * self.binary_scale) * self.decimal_scale
    }
}

pub(crate) struct SimpleDecoderIterator<I: Iterator<Item = N>, N: ToPrimitive> {
    bitwise_iter: I,
    scaling: Scaling,
}

impl<I: Iterator<Item = N>, N: ToPrimitive> SimpleDecoderIterator<I, N> {
    pub(crate) fn new(bitwise_iter: I, scaling: Scaling) -> Self {
        Self {
            bitwise_iter,
            scaling,
        }
    }
}

impl<I: Iterator<Item = N>, N: ToPrimitive> Iterator for SimpleDecoderIterator<I, N> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let encoded = self.bitwise_iter.next()?.to_f64()?;
        Some(self.scaling.apply(encoded))
    }
}

/// Unpacks `num_points` values of `params[3]` bits each.
///
/// With 0 bits every point is the reference value and no payload is read.
pub fn unpack(params: &RepresentationParams, num_points: usize, payload: &[u8]) -> Result<Vec<f64>> {
    let scaling = Scaling::from_params(params)?;
    let num_bits = params.num_bits()?;

    let mut decoded = try_vec_with_capacity(num_points)?;

    if num_bits == 0 {
        decoded.resize(num_points, scaling.reference_value);
        return Ok(decoded);
    }

    let needed = octet_length(num_bits, num_points);
    if payload.len() < needed {
        return Err(GribError::CorruptSection(format!(
            "{} points of {} bits need {} octets, {} available",
            num_points,
            num_bits,
            needed,
            payload.len()
        )));
    }
    if num_bits > u64::BITS as usize {
        return Err(GribError::BitWidthTooLarge(num_bits));
    }

    decoded.extend(SimpleDecoderIterator::new(BitwiseIterator::<u64>::new(payload, num_bits), scaling).take(num_points));

    if decoded.len() != num_points {
        return Err(GribError::DecodeFailure(String::from("Length Mismatch")));
    }

    Ok(decoded)
}

/// Packs `field` with simple packing and records the reference value and
/// bit width in `params`.
pub fn pack(field: &[f64], params: &mut RepresentationParams) -> Result<Vec<u8>> {
    let quantized = quantize(field, params.binary_scale_factor()?, params.decimal_scale_factor()?)?;

    let mut payload = try_zeroed(octet_length(quantized.num_bits, quantized.values.len()))?;
    insert_fields(&mut payload, &quantized.values, 0, quantized.num_bits, 0)?;

    params.set_reference_value(quantized.reference)?;
    params.set_num_bits(quantized.num_bits)?;
    params.set_original_type(0)?;

    debug!("Simple packing : {} points on {} bits", field.len(), quantized.num_bits);

    Ok(payload)
}

/// Data Representation Template 5.0
pub(crate) struct GridPointDataSimplePackingDecoder {}

impl Grib2DataDecoder for GridPointDataSimplePackingDecoder {
    fn decode(&self, data_repr_def: &DataRepresentationDefinition, slice: &[u8]) -> Result<Box<[f64]>> {
        Ok(unpack(&data_repr_def.params, data_repr_def.num_points, slice)?.into_boxed_slice())
    }
}

pub(crate) struct GridPointDataSimplePackingEncoder {}

impl Grib2DataEncoder for GridPointDataSimplePackingEncoder {
    fn encode(&self, field: &[f64], _width: usize, _height: usize, params: &mut RepresentationParams) -> Result<Vec<u8>> {
        pack(field, params)
    }
}

/// Data Representation Template 5.50
///
/// The real part of the (0, 0) coefficient is stored unpacked in the
/// template; the remaining coefficients are simply packed.
pub(crate) struct SpectralDataSimplePackingDecoder {}

impl Grib2DataDecoder for SpectralDataSimplePackingDecoder {
    fn decode(&self, data_repr_def: &DataRepresentationDefinition, slice: &[u8]) -> Result<Box<[f64]>> {
        let params = &data_repr_def.params;
        if data_repr_def.num_points == 0 {
            return Ok(Box::new([]));
        }

        let coefficients = unpack(params, data_repr_def.num_points - 1, slice)?;

        let mut decoded = try_vec_with_capacity(data_repr_def.num_points)?;
        decoded.push(f64::from(params.spectral_real_part()?));
        decoded.extend(coefficients);
        Ok(decoded.into_boxed_slice())
    }
}
