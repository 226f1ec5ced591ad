use crate::config::Jpeg2000Config;
use crate::grib::raster::{EncodeOptions, Raster, RasterCodec};
use crate::grib::sections::sect5::{DataRepresentationDefinition, RepresentationParams};
use crate::grib::sections::sect7::scaling::{check_dimensions, quantize};
use crate::grib::sections::sect7::simple::{Scaling, SimpleDecoderIterator};
use crate::grib::sections::sect7::{Grib2DataDecoder, Grib2DataEncoder};
use crate::grib::{try_vec_with_capacity, GribError, Result};

/// Target ratio recorded for lossless compression.
const LOSSLESS_RATIO: i64 = 255;

/// Packs `field` as a `width` x `height` JPEG2000 codestream.
///
/// `params[5]` selects lossy compression at the ratio in `params[6]`. A
/// failed encode is retried once with extra guard bits.
pub fn pack(
    field: &[f64],
    width: usize,
    height: usize,
    params: &mut RepresentationParams,
    codec: &dyn RasterCodec,
    config: &Jpeg2000Config,
) -> Result<Vec<u8>> {
    check_dimensions(field, width, height)?;
    let quantized = quantize(field, params.binary_scale_factor()?, params.decimal_scale_factor()?)?;

    let lossy = params.lossy()?;
    let payload = if quantized.is_constant() {
        Vec::new()
    } else {
        let raster = Raster::from_pixels(&quantized.values, width, height, quantized.num_bits)?;
        let ratio = params.compression_ratio()?;
        let options = EncodeOptions {
            lossy_ratio: if lossy && ratio > 0 && ratio != LOSSLESS_RATIO { Some(ratio as u32) } else { None },
            extra_guard_bits: None,
        };
        encode_with_retry(codec, &raster, options, config.retry_guard_bits)?
    };

    params.set_reference_value(quantized.reference)?;
    params.set_num_bits(quantized.num_bits)?;
    params.set_original_type(0)?;
    if !lossy {
        params.set_compression_ratio(LOSSLESS_RATIO)?;
    }

    debug!("JPEG2000 packing : {} points on {} bits, {} octets", field.len(), quantized.num_bits, payload.len());

    Ok(payload)
}

fn encode_with_retry(codec: &dyn RasterCodec, raster: &Raster, options: EncodeOptions, guard_bits: u8) -> Result<Vec<u8>> {
    match codec.encode_raster(raster, &options) {
        Ok(bytes) => Ok(bytes),
        Err(first) => {
            warn!("JPEG2000 encoding failed ({}), retrying with {} more guard bits", first, guard_bits);
            let retry = EncodeOptions {
                extra_guard_bits: Some(guard_bits),
                ..options
            };
            match codec.encode_raster(raster, &retry) {
                Ok(bytes) => {
                    info!("JPEG2000 encoding succeeded with {} more guard bits", guard_bits);
                    Ok(bytes)
                }
                Err(e) => {
                    error!("JPEG2000 encoding failed twice : {}", e);
                    Err(GribError::EncodeFailure(e.to_string()))
                }
            }
        }
    }
}

/// Unpacks a JPEG2000 codestream into `num_points` values.
pub fn unpack(params: &RepresentationParams, num_points: usize, payload: &[u8], codec: &dyn RasterCodec) -> Result<Vec<f64>> {
    let scaling = Scaling::from_params(params)?;
    let mut decoded = try_vec_with_capacity(num_points)?;

    if params.num_bits()? == 0 {
        decoded.resize(num_points, scaling.reference_value);
        return Ok(decoded);
    }

    let raster = codec
        .decode_raster(payload)
        .map_err(|e| GribError::DecodeFailure(e.to_string()))?;
    if raster.num_pixels() < num_points {
        return Err(GribError::DecodeFailure(format!(
            "{} pixels decoded, {} expected",
            raster.num_pixels(),
            num_points
        )));
    }

    decoded.extend(SimpleDecoderIterator::new(raster.pixels(num_points)?.into_iter(), scaling));
    Ok(decoded)
}

/// Data Representation Templates 5.40 and 5.40000
pub(crate) struct Jpeg2000DataDecoder<'a> {
    pub(crate) codec: &'a dyn RasterCodec,
}

impl Grib2DataDecoder for Jpeg2000DataDecoder<'_> {
    fn decode(&self, data_repr_def: &DataRepresentationDefinition, slice: &[u8]) -> Result<Box<[f64]>> {
        Ok(unpack(&data_repr_def.params, data_repr_def.num_points, slice, self.codec)?.into_boxed_slice())
    }
}

pub(crate) struct Jpeg2000DataEncoder<'a> {
    pub(crate) codec: &'a dyn RasterCodec,
    pub(crate) config: &'a Jpeg2000Config,
}

impl Grib2DataEncoder for Jpeg2000DataEncoder<'_> {
    fn encode(&self, field: &[f64], width: usize, height: usize, params: &mut RepresentationParams) -> Result<Vec<u8>> {
        pack(field, width, height, params, self.codec, self.config)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use anyhow::bail;
    use super::*;

    /// Stores rasters verbatim, optionally failing the first encodes.
    #[derive(Default)]
    struct FakeCodec {
        failures: Cell<usize>,
        options: RefCell<Vec<String>>,
    }

    impl FakeCodec {
        fn failing(failures: usize) -> Self {
            Self {
                failures: Cell::new(failures),
                ..Default::default()
            }
        }
    }

    impl RasterCodec for FakeCodec {
        fn encode_raster(&self, raster: &Raster, options: &EncodeOptions) -> anyhow::Result<Vec<u8>> {
            self.options.borrow_mut().push(options.to_string());
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                bail!("not enough guard bits");
            }
            let mut out = vec![raster.bit_depth as u8, raster.width as u8, raster.height as u8];
            out.extend(&raster.data);
            Ok(out)
        }

        fn decode_raster(&self, bytes: &[u8]) -> anyhow::Result<Raster> {
            match bytes {
                [depth, width, height, data @ ..] => Ok(Raster {
                    width: *width as usize,
                    height: *height as usize,
                    bit_depth: *depth as usize,
                    data: data.to_vec(),
                }),
                _ => bail!("truncated codestream"),
            }
        }
    }

    #[test]
    fn lossless_round_trip() {
        let codec = FakeCodec::default();
        let mut params = RepresentationParams::for_template(40).unwrap();
        let field = [0.0, 1.0, 2.0, 300.0, 4.0, 5.0];

        let payload = pack(&field, 3, 2, &mut params, &codec, &Jpeg2000Config::default()).unwrap();
        assert_eq!(params.num_bits().unwrap(), 9);
        assert_eq!(params.compression_ratio().unwrap(), 255);
        assert_eq!(payload[..3], [9, 3, 2]);
        assert_eq!(codec.options.borrow().as_slice(), [""]);

        assert_eq!(unpack(&params, 6, &payload, &codec).unwrap(), field);
    }

    #[test]
    fn lossy_options() {
        let codec = FakeCodec::default();
        let mut params = RepresentationParams::for_template(40).unwrap();
        params.set(5, 1).unwrap();
        params.set_compression_ratio(10).unwrap();

        pack(&[1.0, 2.0], 2, 1, &mut params, &codec, &Jpeg2000Config::default()).unwrap();
        assert_eq!(codec.options.borrow().as_slice(), ["mode=real\nrate=0.100000"]);
        assert_eq!(params.compression_ratio().unwrap(), 10);
    }

    #[test]
    fn retries_once_with_guard_bits() {
        let codec = FakeCodec::failing(1);
        let mut params = RepresentationParams::for_template(40).unwrap();
        let config = Jpeg2000Config { retry_guard_bits: 6 };

        let payload = pack(&[1.0, 2.0, 3.0], 3, 1, &mut params, &codec, &config).unwrap();
        assert!(!payload.is_empty());
        assert_eq!(codec.options.borrow().as_slice(), ["", "\nnumgbits=6"]);
    }

    #[test]
    fn second_failure_is_reported() {
        let codec = FakeCodec::failing(2);
        let mut params = RepresentationParams::for_template(40).unwrap();

        let result = pack(&[1.0, 2.0, 3.0], 3, 1, &mut params, &codec, &Jpeg2000Config::default());
        assert!(matches!(result, Err(GribError::EncodeFailure(_))));
        assert_eq!(codec.options.borrow().len(), 2);
    }

    #[test]
    fn constant_field_skips_the_codec() {
        let codec = FakeCodec::failing(5);
        let mut params = RepresentationParams::for_template(40000).unwrap();

        let payload = pack(&[2.5; 4], 2, 2, &mut params, &codec, &Jpeg2000Config::default()).unwrap();
        assert!(payload.is_empty());
        assert!(codec.options.borrow().is_empty());
        assert_eq!(params.num_bits().unwrap(), 0);
        assert_eq!(unpack(&params, 4, &payload, &codec).unwrap(), [2.5; 4]);
    }

    #[test]
    fn decode_failures() {
        let codec = FakeCodec::default();
        let mut params = RepresentationParams::for_template(40).unwrap();
        params.set_num_bits(8).unwrap();
        assert!(matches!(unpack(&params, 2, &[8], &codec), Err(GribError::DecodeFailure(_))));
        assert!(matches!(unpack(&params, 2, &[8, 1, 1, 0], &codec), Err(GribError::DecodeFailure(_))));
    }
}
