//! Static template registry.
//!
//! A template is the octet map of a section's variable part. Some product
//! templates only know their full length once earlier entries have been read
//! (the number of time ranges, of spectral bands, ...); their growth rule is
//! kept as data in [`pds::EXTENSIONS`].

mod drs;
mod pds;

use std::fmt;
use crate::grib::bits::BitCursor;
use crate::grib::utils::{sign_magnitude_decode, sign_magnitude_encode};
use crate::grib::{try_vec_with_capacity, GribError, Result};

/// Entries in one time range specification of the statistically processed templates.
const TIME_RANGE_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateCategory {
    /// Section 4
    ProductDefinition,
    /// Section 5
    DataRepresentation,
}

impl TemplateCategory {
    /// Number of the section the templates of this category describe.
    pub fn section(&self) -> u8 {
        match self {
            TemplateCategory::ProductDefinition => 4,
            TemplateCategory::DataRepresentation => 5,
        }
    }

    fn templates(&self) -> &'static [TemplateDescriptor] {
        match self {
            TemplateCategory::ProductDefinition => pds::TEMPLATES,
            TemplateCategory::DataRepresentation => drs::TEMPLATES,
        }
    }

    fn extension(&self, number: u16) -> Option<&'static Extension> {
        match self {
            TemplateCategory::ProductDefinition => pds::EXTENSIONS
                .iter()
                .find(|(n, _)| *n == number)
                .map(|(_, extension)| extension),
            TemplateCategory::DataRepresentation => None,
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateCategory::ProductDefinition => write!(f, "PDS {}", self.section()),
            TemplateCategory::DataRepresentation => write!(f, "DRS {}", self.section()),
        }
    }
}

/// The registered octet map of one template.
///
/// The magnitude of a width is the number of octets of the entry; a negative
/// width marks an entry stored in sign-magnitude form.
#[derive(Debug, PartialEq, Eq)]
pub struct TemplateDescriptor {
    pub category: TemplateCategory,
    pub number: u16,
    pub widths: &'static [i8],
    pub needs_extension: bool,
}

/// Growth rule of a template whose length depends on its own values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extension {
    /// `values[count_at]` one-octet entries.
    Scalars { count_at: usize },
    /// `values[count_at]` copies of `record`.
    Records { count_at: usize, record: &'static [i8] },
    /// `values[count_at] - 1` copies of the time range specification at
    /// `record_at`, then `values[trailing_at]` one-octet entries.
    Repeat { count_at: usize, record_at: usize, trailing_at: Option<usize> },
}

impl Extension {
    fn count(number: u16, values: &[i64], index: usize) -> Result<usize> {
        let count = values
            .get(index)
            .ok_or(GribError::MissingTemplateValue { number, index })?;
        Ok(usize::try_from(*count).unwrap_or(0))
    }

    fn widths(&self, descriptor: &TemplateDescriptor, values: &[i64]) -> Result<Vec<i8>> {
        let number = descriptor.number;
        match *self {
            Extension::Scalars { count_at } => {
                let count = Self::count(number, values, count_at)?;
                let mut ext = try_vec_with_capacity(count)?;
                ext.resize(count, 1);
                Ok(ext)
            }
            Extension::Records { count_at, record } => {
                let count = Self::count(number, values, count_at)?;
                let mut ext = try_vec_with_capacity(extension_len(count, record.len(), 0))?;
                for _ in 0..count {
                    ext.extend_from_slice(record);
                }
                Ok(ext)
            }
            Extension::Repeat { count_at, record_at, trailing_at } => {
                let repeats = Self::count(number, values, count_at)?.saturating_sub(1);
                let trailing = match trailing_at {
                    Some(index) => Self::count(number, values, index)?,
                    None => 0,
                };
                let record = &descriptor.widths[record_at..record_at + TIME_RANGE_LEN];
                let mut ext = try_vec_with_capacity(extension_len(repeats, TIME_RANGE_LEN, trailing))?;
                for _ in 0..repeats {
                    ext.extend_from_slice(record);
                }
                ext.resize(ext.len() + trailing, 1);
                Ok(ext)
            }
        }
    }
}

/// Entries of `count` records of `record_len` plus `trailing` scalars.
///
/// An overflowing length saturates, so that reserving it fails with a
/// capacity overflow.
fn extension_len(count: usize, record_len: usize, trailing: usize) -> usize {
    count
        .checked_mul(record_len)
        .and_then(|len| len.checked_add(trailing))
        .unwrap_or(usize::MAX)
}

/// A template resolved for one set of values: its static map plus extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInstance {
    descriptor: &'static TemplateDescriptor,
    widths: Vec<i8>,
}

impl TemplateInstance {
    fn from_descriptor(descriptor: &'static TemplateDescriptor) -> Result<Self> {
        let mut widths = try_vec_with_capacity(descriptor.widths.len())?;
        widths.extend_from_slice(descriptor.widths);
        Ok(Self { descriptor, widths })
    }

    pub fn descriptor(&self) -> &'static TemplateDescriptor {
        self.descriptor
    }

    pub fn number(&self) -> u16 {
        self.descriptor.number
    }

    /// Static widths followed by the extension.
    pub fn widths(&self) -> &[i8] {
        &self.widths
    }

    pub fn extension(&self) -> &[i8] {
        &self.widths[self.descriptor.widths.len()..]
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Octets taken by all entries.
    pub fn octet_len(&self) -> usize {
        self.widths.iter().map(|w| w.unsigned_abs() as usize).sum()
    }

    /// Reads one value per entry, starting at the cursor.
    pub fn read_values(&self, buf: &[u8], cursor: &mut BitCursor) -> Result<Vec<i64>> {
        read_entries(&self.widths, buf, cursor)
    }

    /// Writes one value per entry, starting at the cursor.
    pub fn write_values(&self, values: &[i64], buf: &mut [u8], cursor: &mut BitCursor) -> Result<()> {
        if values.len() < self.widths.len() {
            return Err(GribError::MissingTemplateValue { number: self.number(), index: values.len() });
        }
        for (width, value) in self.widths.iter().zip(values) {
            let nbits = width.unsigned_abs() as usize * 8;
            let raw = if *width < 0 {
                sign_magnitude_encode(*value, nbits)
            } else {
                *value as u64
            };
            cursor.write(buf, raw, nbits)?;
        }
        Ok(())
    }
}

fn read_entries(widths: &[i8], buf: &[u8], cursor: &mut BitCursor) -> Result<Vec<i64>> {
    let mut values = try_vec_with_capacity(widths.len())?;
    for width in widths {
        let nbits = width.unsigned_abs() as usize * 8;
        let raw = cursor.read(buf, nbits)?;
        values.push(if *width < 0 {
            sign_magnitude_decode(raw, nbits)
        } else {
            raw as i64
        });
    }
    Ok(values)
}

/// Finds the registered template `number` of `category`.
pub fn lookup(category: TemplateCategory, number: u16) -> Result<&'static TemplateDescriptor> {
    category
        .templates()
        .iter()
        .find(|t| t.number == number)
        .ok_or_else(|| {
            warn!("{} Template {}.{} not defined", category, category.section(), number);
            GribError::TemplateNotFound { category, number }
        })
}

/// Resolves the full octet map of template `number` for the given values.
///
/// Templates that never grow come back with their static map whatever
/// `values` holds.
pub fn extend(category: TemplateCategory, number: u16, values: &[i64]) -> Result<TemplateInstance> {
    let descriptor = lookup(category, number)?;
    let mut instance = TemplateInstance::from_descriptor(descriptor)?;

    if !descriptor.needs_extension {
        return Ok(instance);
    }

    if let Some(extension) = category.extension(number) {
        let ext = extension.widths(descriptor, values)?;
        instance.widths.try_reserve_exact(ext.len())?;
        instance.widths.extend_from_slice(&ext);
    }

    Ok(instance)
}

/// Reads the values of template `number`: the static entries first, then the
/// extension they call for.
pub fn read_template(
    category: TemplateCategory,
    number: u16,
    buf: &[u8],
    cursor: &mut BitCursor,
) -> Result<(TemplateInstance, Vec<i64>)> {
    let descriptor = lookup(category, number)?;
    let mut values = read_entries(descriptor.widths, buf, cursor)?;

    let instance = extend(category, number, &values)?;
    let ext = read_entries(instance.extension(), buf, cursor)?;
    values.try_reserve_exact(ext.len())?;
    values.extend(ext);

    debug!("Read {} Template {}.{} : {} values", category, category.section(), number, values.len());

    Ok((instance, values))
}
