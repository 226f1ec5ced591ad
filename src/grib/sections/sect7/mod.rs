//! Section 7, the data section.

use crate::config::Config;
use crate::grib::bits::BitCursor;
use crate::grib::raster::{PngRasterCodec, RasterCodec};
use crate::grib::sections::sect3::{GridDefinition, SpectralTruncation};
use crate::grib::sections::sect5::{DataRepresentationDefinition, RepresentationParams};
use crate::grib::sections::SectionHeader;
use crate::grib::{try_zeroed, GribError, Result, SECT_HEADER_SIZE};

pub mod complex;
mod complex_spacial_diff;
mod groups;
pub mod jpeg2000;
pub mod png;
pub mod scaling;
pub mod simple;

use self::complex::GridPointDataComplexPackingDecoder;
use self::jpeg2000::{Jpeg2000DataDecoder, Jpeg2000DataEncoder};
use self::png::{PngDataDecoder, PngDataEncoder};
use self::simple::{GridPointDataSimplePackingDecoder, GridPointDataSimplePackingEncoder, SpectralDataSimplePackingDecoder};

const DATA_SECTION: u8 = 7;

pub trait Grib2DataDecoder {
    fn decode(&self, data_repr_def: &DataRepresentationDefinition, slice: &[u8]) -> Result<Box<[f64]>>;
}

pub trait Grib2DataEncoder {
    /// Packs `field`, laid out as `width` x `height`, and updates `params`
    /// with the reference value and bit width used.
    fn encode(&self, field: &[f64], width: usize, height: usize, params: &mut RepresentationParams) -> Result<Vec<u8>>;
}

/// Spherical harmonics complex packing (5.51).
pub trait SpectralDataDecoder {
    fn decode(
        &self,
        data_repr_def: &DataRepresentationDefinition,
        truncation: SpectralTruncation,
        slice: &[u8],
    ) -> Result<Box<[f64]>>;
}

/// Unpacks data sections, delegating to external collaborators where needed.
pub struct DataSectionDecoder {
    complex: Box<dyn Grib2DataDecoder>,
    spectral: Option<Box<dyn SpectralDataDecoder>>,
    jpeg2000: Option<Box<dyn RasterCodec>>,
    png: Box<dyn RasterCodec>,
}

impl Default for DataSectionDecoder {
    fn default() -> Self {
        Self {
            complex: Box::new(GridPointDataComplexPackingDecoder {}),
            spectral: None,
            jpeg2000: None,
            png: Box::new(PngRasterCodec),
        }
    }
}

impl DataSectionDecoder {
    pub fn with_complex(self, complex: Box<dyn Grib2DataDecoder>) -> Self {
        Self { complex, ..self }
    }

    pub fn with_spectral(self, spectral: Box<dyn SpectralDataDecoder>) -> Self {
        Self { spectral: Some(spectral), ..self }
    }

    pub fn with_jpeg2000(self, codec: Box<dyn RasterCodec>) -> Self {
        Self { jpeg2000: Some(codec), ..self }
    }

    pub fn with_png(self, codec: Box<dyn RasterCodec>) -> Self {
        Self { png: codec, ..self }
    }

    /// Unpacks the data section at the cursor into `data_repr_def.num_points` values.
    ///
    /// On success the cursor is moved past the whole section as declared by
    /// its length, whatever the algorithm consumed. On failure it is left
    /// where it was.
    pub fn unpack(
        &self,
        buf: &[u8],
        cursor: &mut BitCursor,
        grid: &GridDefinition,
        data_repr_def: &DataRepresentationDefinition,
    ) -> Result<Box<[f64]>> {
        let start = cursor.position();
        let mut c = *cursor;
        let header = SectionHeader::read(buf, &mut c, DATA_SECTION)?;
        let slice = &buf[c.byte_position()..start / 8 + header.size];

        let template_number = data_repr_def.template_number();
        debug!("Data section : DRT 5.{}, {} points, {} octets", template_number, data_repr_def.num_points, slice.len());

        let decoded = match template_number {
            0 => GridPointDataSimplePackingDecoder {}.decode(data_repr_def, slice)?,
            2 | 3 => self.complex.decode(data_repr_def, slice)?,
            50 => SpectralDataSimplePackingDecoder {}.decode(data_repr_def, slice)?,
            51 => {
                if !grid.is_spectral() {
                    error!("Cannot use GDT 3.{} to unpack Data Section 5.51", grid.template_number);
                    return Err(GribError::IncompatibleGridTemplate { drt: 51, gdt: grid.template_number });
                }
                let truncation = grid.truncation().ok_or_else(|| {
                    GribError::CorruptSection(format!("GDT 3.{} lacks the J, K and M truncation", grid.template_number))
                })?;
                match &self.spectral {
                    Some(spectral) => spectral.decode(data_repr_def, truncation, slice)?,
                    None => return Err(unsupported(template_number)),
                }
            }
            40 | 40000 => match &self.jpeg2000 {
                Some(codec) => Jpeg2000DataDecoder { codec: codec.as_ref() }.decode(data_repr_def, slice)?,
                None => return Err(unsupported(template_number)),
            },
            41 | 40010 => PngDataDecoder { codec: self.png.as_ref() }.decode(data_repr_def, slice)?,
            _ => return Err(unsupported(template_number)),
        };

        cursor.set_position(start + header.size * 8);
        Ok(decoded)
    }
}

fn unsupported(template_number: u16) -> GribError {
    error!("Data Representation Template 5.{} not yet implemented", template_number);
    GribError::UnsupportedTemplate(template_number)
}

/// Packs fields into data sections.
pub struct DataSectionEncoder {
    config: Config,
    jpeg2000: Option<Box<dyn RasterCodec>>,
    png: Box<dyn RasterCodec>,
}

impl Default for DataSectionEncoder {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl DataSectionEncoder {
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            jpeg2000: None,
            png: Box::new(PngRasterCodec),
        }
    }

    pub fn with_jpeg2000(self, codec: Box<dyn RasterCodec>) -> Self {
        Self { jpeg2000: Some(codec), ..self }
    }

    pub fn with_png(self, codec: Box<dyn RasterCodec>) -> Self {
        Self { png: codec, ..self }
    }

    /// Packs `field` with the template of `data_repr_def` and returns the
    /// whole data section.
    ///
    /// `data_repr_def` is updated with the number of points and the values
    /// chosen while packing, ready to be written as Section 5.
    pub fn pack(
        &self,
        field: &[f64],
        width: usize,
        height: usize,
        data_repr_def: &mut DataRepresentationDefinition,
    ) -> Result<Vec<u8>> {
        let template_number = data_repr_def.template_number();
        let params = &mut data_repr_def.params;

        let payload = match template_number {
            0 => GridPointDataSimplePackingEncoder {}.encode(field, width, height, params)?,
            40 | 40000 => match &self.jpeg2000 {
                Some(codec) => Jpeg2000DataEncoder { codec: codec.as_ref(), config: &self.config.jpeg2000 }
                    .encode(field, width, height, params)?,
                None => return Err(unsupported(template_number)),
            },
            41 | 40010 => PngDataEncoder { codec: self.png.as_ref(), config: &self.config.png }
                .encode(field, width, height, params)?,
            _ => return Err(unsupported(template_number)),
        };

        data_repr_def.num_points = field.len();
        write_data_section(&payload)
    }
}

/// Wraps `payload` in a data section header.
pub fn write_data_section(payload: &[u8]) -> Result<Vec<u8>> {
    let size = SECT_HEADER_SIZE + payload.len();
    if u32::try_from(size).is_err() {
        return Err(GribError::EncodeFailure(format!("Data section of {} octets", size)));
    }

    let mut buf = try_zeroed(size)?;
    let mut c = BitCursor::new();
    SectionHeader { size, number: DATA_SECTION }.write(&mut buf, &mut c)?;
    buf[SECT_HEADER_SIZE..].copy_from_slice(payload);
    Ok(buf)
}
