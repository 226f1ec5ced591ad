use crate::config::PngConfig;
use crate::grib::bits::extract_fields;
use crate::grib::raster::{EncodeOptions, Raster, RasterCodec};
use crate::grib::sections::sect5::{DataRepresentationDefinition, RepresentationParams};
use crate::grib::sections::sect7::scaling::{check_dimensions, quantize};
use crate::grib::sections::sect7::simple::{Scaling, SimpleDecoderIterator};
use crate::grib::sections::sect7::{Grib2DataDecoder, Grib2DataEncoder};
use crate::grib::{try_vec_with_capacity, GribError, Result};

/// Pixel depths a PNG raster can carry.
pub const PNG_DEPTHS: [usize; 4] = [8, 16, 24, 32];

/// Smallest PNG depth holding `num_bits`, never below `minimum_depth`.
fn snap_depth(num_bits: usize, minimum_depth: usize) -> Option<usize> {
    PNG_DEPTHS.into_iter().find(|depth| *depth >= num_bits.max(minimum_depth))
}

/// Packs `field` as a `width` x `height` PNG image.
///
/// The bit width is rounded up to a PNG depth and recorded as such in
/// `params[3]`.
pub fn pack(
    field: &[f64],
    width: usize,
    height: usize,
    params: &mut RepresentationParams,
    codec: &dyn RasterCodec,
    config: &PngConfig,
) -> Result<Vec<u8>> {
    check_dimensions(field, width, height)?;
    let quantized = quantize(field, params.binary_scale_factor()?, params.decimal_scale_factor()?)?;

    let (num_bits, payload) = if quantized.is_constant() {
        (0, Vec::new())
    } else {
        let depth = snap_depth(quantized.num_bits, config.minimum_depth).ok_or_else(|| {
            GribError::EncodeFailure(format!("{} bits do not fit a PNG pixel", quantized.num_bits))
        })?;
        let raster = Raster::from_pixels(&quantized.values, width, height, depth)?;
        let bytes = codec
            .encode_raster(&raster, &EncodeOptions::default())
            .map_err(|e| {
                error!("PNG encoding failed : {}", e);
                GribError::EncodeFailure(e.to_string())
            })?;
        (depth, bytes)
    };

    params.set_reference_value(quantized.reference)?;
    params.set_num_bits(num_bits)?;
    params.set_original_type(0)?;

    debug!("PNG packing : {} points on {} bits, {} octets", field.len(), num_bits, payload.len());

    Ok(payload)
}

/// Unpacks a PNG image into `num_points` values of `params[3]` bits.
pub fn unpack(params: &RepresentationParams, num_points: usize, payload: &[u8], codec: &dyn RasterCodec) -> Result<Vec<f64>> {
    let scaling = Scaling::from_params(params)?;
    let num_bits = params.num_bits()?;
    let mut decoded = try_vec_with_capacity(num_points)?;

    if num_bits == 0 {
        decoded.resize(num_points, scaling.reference_value);
        return Ok(decoded);
    }

    let raster = codec
        .decode_raster(payload)
        .map_err(|e| GribError::DecodeFailure(e.to_string()))?;
    let packed = extract_fields(&raster.data, 0, num_bits, 0, num_points).map_err(|_| {
        GribError::DecodeFailure(format!(
            "{} octets decoded, {} values of {} bits expected",
            raster.data.len(),
            num_points,
            num_bits
        ))
    })?;

    decoded.extend(SimpleDecoderIterator::new(packed.into_iter(), scaling));
    Ok(decoded)
}

/// Data Representation Templates 5.41 and 5.40010
pub(crate) struct PngDataDecoder<'a> {
    pub(crate) codec: &'a dyn RasterCodec,
}

impl Grib2DataDecoder for PngDataDecoder<'_> {
    fn decode(&self, data_repr_def: &DataRepresentationDefinition, slice: &[u8]) -> Result<Box<[f64]>> {
        Ok(unpack(&data_repr_def.params, data_repr_def.num_points, slice, self.codec)?.into_boxed_slice())
    }
}

pub(crate) struct PngDataEncoder<'a> {
    pub(crate) codec: &'a dyn RasterCodec,
    pub(crate) config: &'a PngConfig,
}

impl Grib2DataEncoder for PngDataEncoder<'_> {
    fn encode(&self, field: &[f64], width: usize, height: usize, params: &mut RepresentationParams) -> Result<Vec<u8>> {
        pack(field, width, height, params, self.codec, self.config)
    }
}
