use crate::grib::bits::BitCursor;
use crate::grib::sections::SectionHeader;
use crate::grib::templates::{extend, lookup, read_template, TemplateCategory};
use crate::grib::{try_zeroed, GribError, Result, SECT_HEADER_SIZE};

const REPRESENTATION_SECTION: u8 = 5;
/// Number of data points and template number.
const SECT5_FIXED_SIZE: usize = 6;

/// Values of a Data Representation Template 5.N.
///
/// Positions 0 to 4 mean the same for every template: reference value
/// (IEEE bits), binary scale factor, decimal scale factor, number of bits
/// and type of original values. The rest depend on the template:
///
/// * 5.2 / 5.3: 5 group splitting method, 6 missing value management,
///   7 and 8 primary and secondary missing value substitutes, 9 number of
///   groups, 10 reference for group widths, 11 bits of group widths,
///   12 reference for group lengths, 13 length increment, 14 true length
///   of the last group, 15 bits of scaled group lengths, and for 5.3 only
///   16 order of spatial differencing and 17 octets of extra descriptors.
/// * 5.40: 5 type of compression (0 lossless, 1 lossy), 6 target
///   compression ratio (255 when lossless).
/// * 5.50: 4 real part of the (0, 0) coefficient (IEEE bits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentationParams {
    template_number: u16,
    values: Vec<i64>,
}

impl RepresentationParams {
    pub fn new(template_number: u16, values: Vec<i64>) -> Self {
        Self {
            template_number,
            values,
        }
    }

    /// All entries of a registered template set to 0.
    pub fn for_template(template_number: u16) -> Result<Self> {
        let descriptor = lookup(TemplateCategory::DataRepresentation, template_number)?;
        Ok(Self::new(template_number, vec![0; descriptor.widths.len()]))
    }

    pub fn template_number(&self) -> u16 {
        self.template_number
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Result<i64> {
        self.values
            .get(index)
            .copied()
            .ok_or(GribError::MissingTemplateValue { number: self.template_number, index })
    }

    pub fn set(&mut self, index: usize, value: i64) -> Result<()> {
        let number = self.template_number;
        let slot = self
            .values
            .get_mut(index)
            .ok_or(GribError::MissingTemplateValue { number, index })?;
        *slot = value;
        Ok(())
    }

    pub fn reference_value(&self) -> Result<f32> {
        Ok(f32::from_bits(self.get(0)? as u32))
    }

    pub fn set_reference_value(&mut self, reference: f32) -> Result<()> {
        self.set(0, i64::from(reference.to_bits()))
    }

    pub fn binary_scale_factor(&self) -> Result<i32> {
        Ok(self.get(1)? as i32)
    }

    pub fn decimal_scale_factor(&self) -> Result<i32> {
        Ok(self.get(2)? as i32)
    }

    pub fn num_bits(&self) -> Result<usize> {
        usize::try_from(self.get(3)?)
            .map_err(|_| GribError::CorruptSection(format!("Negative number of bits in DRT 5.{}", self.template_number)))
    }

    pub fn set_num_bits(&mut self, num_bits: usize) -> Result<()> {
        self.set(3, num_bits as i64)
    }

    /// Type of original field values: 0 floating point, 1 integer.
    pub fn original_type(&self) -> Result<i64> {
        self.get(4)
    }

    pub fn set_original_type(&mut self, original_type: i64) -> Result<()> {
        self.set(4, original_type)
    }

    pub fn lossy(&self) -> Result<bool> {
        Ok(self.get(5)? == 1)
    }

    pub fn compression_ratio(&self) -> Result<i64> {
        self.get(6)
    }

    pub fn set_compression_ratio(&mut self, ratio: i64) -> Result<()> {
        self.set(6, ratio)
    }

    pub fn spectral_real_part(&self) -> Result<f32> {
        Ok(f32::from_bits(self.get(4)? as u32))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRepresentationDefinition {
    /// Number of data points where one or more values are specified in Section 7
    pub num_points: usize,
    pub params: RepresentationParams,
}

impl DataRepresentationDefinition {
    pub fn new(num_points: usize, params: RepresentationParams) -> Self {
        Self { num_points, params }
    }

    pub fn template_number(&self) -> u16 {
        self.params.template_number()
    }

    /// Unpacks Section 5 at the cursor and leaves the cursor after it.
    pub fn unpack(buf: &[u8], cursor: &mut BitCursor) -> Result<Self> {
        let start = cursor.position();
        let mut c = *cursor;
        let header = SectionHeader::read(buf, &mut c, REPRESENTATION_SECTION)?;

        let num_points = c.read(buf, 32)? as usize;
        let template_number = c.read(buf, 16)? as u16;
        let (_, values) = read_template(TemplateCategory::DataRepresentation, template_number, buf, &mut c)?;

        cursor.set_position(start + header.size * 8);

        Ok(Self::new(num_points, RepresentationParams::new(template_number, values)))
    }

    /// Packs the section back, header included.
    pub fn pack(&self) -> Result<Vec<u8>> {
        let template = extend(TemplateCategory::DataRepresentation, self.template_number(), self.params.values())?;
        let size = SECT_HEADER_SIZE + SECT5_FIXED_SIZE + template.octet_len();
        let mut buf = try_zeroed(size)?;
        let mut c = BitCursor::new();

        SectionHeader { size, number: REPRESENTATION_SECTION }.write(&mut buf, &mut c)?;
        c.write(&mut buf, self.num_points as u64, 32)?;
        c.write(&mut buf, u64::from(self.template_number()), 16)?;
        template.write_values(self.params.values(), &mut buf, &mut c)?;

        Ok(buf)
    }
}
