//! Grayscale rasters exchanged with external image codecs.

use std::fmt;
use std::io::Cursor;
use anyhow::{anyhow, bail};
use image::codecs::png::{PngDecoder, PngEncoder};
use image::{ColorType, ImageDecoder, ImageEncoder};
use crate::grib::bits::{extract_fields, insert_fields};
use crate::grib::{try_zeroed, GribError, Result};

/// A `width` x `height` image of unsigned pixels of `bit_depth` bits.
///
/// Each pixel occupies `ceil(bit_depth / 8)` octets of `data`, big-endian and
/// right-justified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub bit_depth: usize,
    pub data: Vec<u8>,
}

impl Raster {
    pub fn bytes_per_pixel(bit_depth: usize) -> usize {
        bit_depth.div_ceil(8)
    }

    /// Lays `pixels` out row after row.
    pub fn from_pixels(pixels: &[u64], width: usize, height: usize, bit_depth: usize) -> Result<Self> {
        let bpp = Self::bytes_per_pixel(bit_depth);
        let len = pixels
            .len()
            .checked_mul(bpp)
            .ok_or_else(|| GribError::EncodeFailure(format!("{} pixels of {} bits", pixels.len(), bit_depth)))?;
        let mut data = try_zeroed(len)?;
        insert_fields(&mut data, pixels, 0, bpp * 8, 0)?;
        Ok(Self {
            width,
            height,
            bit_depth,
            data,
        })
    }

    /// Reads back the first `count` pixels.
    pub fn pixels(&self, count: usize) -> Result<Vec<u64>> {
        extract_fields(&self.data, 0, Self::bytes_per_pixel(self.bit_depth) * 8, 0, count)
    }

    pub fn num_pixels(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

/// Options handed to an encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Target compression ratio (ratio:1); lossless when `None`.
    pub lossy_ratio: Option<u32>,
    /// Extra guard bits, only set when retrying a failed encode.
    pub extra_guard_bits: Option<u8>,
}

/// Renders the JasPer option string.
impl fmt::Display for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ratio) = self.lossy_ratio {
            write!(f, "mode=real\nrate={:.6}", 1.0 / ratio as f64)?;
        }
        if let Some(bits) = self.extra_guard_bits {
            write!(f, "\nnumgbits={}", bits)?;
        }
        Ok(())
    }
}

/// An external entropy coder for grayscale rasters (JPEG2000, PNG).
pub trait RasterCodec {
    fn encode_raster(&self, raster: &Raster, options: &EncodeOptions) -> anyhow::Result<Vec<u8>>;

    fn decode_raster(&self, bytes: &[u8]) -> anyhow::Result<Raster>;
}

/// PNG adapter.
///
/// Depths map to color types the way GRIB2 PNG packing expects: 8 and 16 bit
/// gray, 24 bit RGB, 32 bit RGBA, each octet of a pixel becoming one sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngRasterCodec;

impl PngRasterCodec {
    fn color_type(bit_depth: usize) -> anyhow::Result<ColorType> {
        Ok(match bit_depth {
            8 => ColorType::L8,
            16 => ColorType::L16,
            24 => ColorType::Rgb8,
            32 => ColorType::Rgba8,
            n => bail!("unsupported PNG depth {}", n),
        })
    }
}

impl RasterCodec for PngRasterCodec {
    fn encode_raster(&self, raster: &Raster, _options: &EncodeOptions) -> anyhow::Result<Vec<u8>> {
        let color_type = Self::color_type(raster.bit_depth)?;
        let expected = raster.num_pixels().checked_mul(Raster::bytes_per_pixel(raster.bit_depth));
        if expected != Some(raster.data.len()) {
            bail!("raster holds {} octets, {}x{} pixels expected", raster.data.len(), raster.width, raster.height);
        }

        // 16 bit samples go in native order, the encoder writes them big-endian
        let samples: Vec<u8> = if color_type == ColorType::L16 {
            raster.data
                .chunks_exact(2)
                .flat_map(|be| u16::from_be_bytes([be[0], be[1]]).to_ne_bytes())
                .collect()
        } else {
            raster.data.clone()
        };

        let mut out = Vec::new();
        PngEncoder::new(&mut out).write_image(
            &samples,
            u32::try_from(raster.width)?,
            u32::try_from(raster.height)?,
            color_type,
        )?;
        Ok(out)
    }

    fn decode_raster(&self, bytes: &[u8]) -> anyhow::Result<Raster> {
        let decoder = PngDecoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let bit_depth = match color_type {
            ColorType::L8 => 8,
            ColorType::L16 => 16,
            ColorType::Rgb8 => 24,
            ColorType::Rgba8 => 32,
            other => return Err(anyhow!("unsupported PNG color type {:?}", other)),
        };

        let mut data = try_zeroed(usize::try_from(decoder.total_bytes())?)?;
        decoder.read_image(&mut data)?;
        if color_type == ColorType::L16 {
            for sample in data.chunks_exact_mut(2) {
                let be = u16::from_ne_bytes([sample[0], sample[1]]).to_be_bytes();
                sample.copy_from_slice(&be);
            }
        }

        Ok(Raster {
            width: width as usize,
            height: height as usize,
            bit_depth,
            data,
        })
    }
}
