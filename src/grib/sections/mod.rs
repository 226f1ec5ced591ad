use crate::grib::bits::BitCursor;
use crate::grib::{GribError, Result, SECT_HEADER_SIZE};

pub mod sect3;
pub mod sect4;
pub mod sect5;
pub mod sect7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    /// Length : Length of the section in octets
    pub size: usize, // u32
    /// Number : Number of the section
    pub number: u8,
}

impl SectionHeader {
    /// Reads the header of section `expected` at the cursor.
    ///
    /// The declared length must fit in `buf`. The cursor only moves past the
    /// header when the header is valid.
    pub fn read(buf: &[u8], cursor: &mut BitCursor, expected: u8) -> Result<Self> {
        let start = cursor.position();
        if start % 8 != 0 {
            return Err(GribError::CorruptSection(format!("Section {} does not start on an octet", expected)));
        }

        let mut c = *cursor;
        let size = c.read(buf, 32)? as usize;
        let number = c.read(buf, 8)? as u8;

        if number != expected {
            return Err(GribError::WrongSectionNumber { expected, found: number });
        }

        if size < SECT_HEADER_SIZE || start / 8 + size > buf.len() {
            return Err(GribError::CorruptSection(format!(
                "Section {} declares {} octets, {} available",
                number,
                size,
                buf.len() - start / 8
            )));
        }

        debug!("Read section {} : {}(-{} : {})", number, size, SECT_HEADER_SIZE, size - SECT_HEADER_SIZE);

        *cursor = c;
        Ok(Self { size, number })
    }

    /// Writes the header at the cursor.
    pub fn write(&self, buf: &mut [u8], cursor: &mut BitCursor) -> Result<()> {
        cursor.write(buf, self.size as u64, 32)?;
        cursor.write(buf, u64::from(self.number), 8)
    }

    /// Octets following the header.
    pub fn body_size(&self) -> usize {
        self.size - SECT_HEADER_SIZE
    }
}
