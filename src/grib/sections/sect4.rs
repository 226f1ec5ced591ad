use crate::grib::bits::BitCursor;
use crate::grib::sections::SectionHeader;
use crate::grib::templates::{read_template, TemplateCategory, TemplateInstance};
use crate::grib::{try_vec_with_capacity, try_zeroed, Result, SECT_HEADER_SIZE};

const PRODUCT_SECTION: u8 = 4;
/// Coordinate count and template number.
const SECT4_FIXED_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDefinition {
    /// Product Definition Template Number
    pub template_number: u16,
    /// Octet map the values were read with, extension included
    pub template: TemplateInstance,
    /// Entries of Product Definition Template 4.N
    pub values: Vec<i64>,
    /// Optional list of vertical coordinate values
    pub coordinates: Vec<f32>,
}

impl ProductDefinition {
    /// Unpacks Section 4 at the cursor and leaves the cursor after it.
    pub fn unpack(buf: &[u8], cursor: &mut BitCursor) -> Result<Self> {
        let start = cursor.position();
        let mut c = *cursor;
        let header = SectionHeader::read(buf, &mut c, PRODUCT_SECTION)?;

        let num_coordinates = c.read(buf, 16)? as usize;
        let template_number = c.read(buf, 16)? as u16;
        let (template, values) = read_template(TemplateCategory::ProductDefinition, template_number, buf, &mut c)?;

        let mut coordinates = try_vec_with_capacity(num_coordinates)?;
        for _ in 0..num_coordinates {
            coordinates.push(f32::from_bits(c.read(buf, 32)? as u32));
        }

        cursor.set_position(start + header.size * 8);

        Ok(Self {
            template_number,
            template,
            values,
            coordinates,
        })
    }

    /// Packs the section back, header included.
    pub fn pack(&self) -> Result<Vec<u8>> {
        let size = SECT_HEADER_SIZE + SECT4_FIXED_SIZE + self.template.octet_len() + 4 * self.coordinates.len();
        let mut buf = try_zeroed(size)?;
        let mut c = BitCursor::new();

        SectionHeader { size, number: PRODUCT_SECTION }.write(&mut buf, &mut c)?;
        c.write(&mut buf, self.coordinates.len() as u64, 16)?;
        c.write(&mut buf, u64::from(self.template_number), 16)?;
        self.template.write_values(&self.values, &mut buf, &mut c)?;
        for coordinate in &self.coordinates {
            c.write(&mut buf, u64::from(coordinate.to_bits()), 32)?;
        }

        Ok(buf)
    }

    pub fn parameter_category(&self) -> Option<i64> {
        self.values.first().copied()
    }

    pub fn parameter_number(&self) -> Option<i64> {
        self.values.get(1).copied()
    }
}
