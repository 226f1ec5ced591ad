pub mod bits;
pub mod raster;
pub mod sections;
pub mod templates;
mod utils;

use std::collections::TryReserveError;

pub use crate::grib::templates::TemplateCategory;

/// Octets taken by the length and number fields that open every section.
pub(crate) const SECT_HEADER_SIZE: usize = 5;

pub type Result<T, E = GribError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum GribError {
    #[error("TemplateNotFound({category} template {number})")]
    TemplateNotFound { category: TemplateCategory, number: u16 },

    #[error("MissingTemplateValue(template {number}, index {index})")]
    MissingTemplateValue { number: u16, index: usize },

    #[error("WrongSectionNumber(expected {expected}, found {found})")]
    WrongSectionNumber { expected: u8, found: u8 },

    #[error("CorruptSection({0})")]
    CorruptSection(String),

    #[error("IncompatibleGridTemplate(cannot use GDT 3.{gdt} to unpack DRT 5.{drt})")]
    IncompatibleGridTemplate { drt: u16, gdt: u16 },

    #[error("UnsupportedTemplate(5.{0})")]
    UnsupportedTemplate(u16),

    #[error("AllocationFailure({0})")]
    AllocationFailure(#[from] TryReserveError),

    #[error("EncodeFailure({0})")]
    EncodeFailure(String),

    #[error("DecodeFailure({0})")]
    DecodeFailure(String),

    #[error("BitWidthTooLarge({0} > 64)")]
    BitWidthTooLarge(usize),

    #[error("OutOfBounds(offset {offset} + {nbits} bits past {len} bytes)")]
    OutOfBounds { offset: usize, nbits: usize, len: usize },
}

/// Allocates an empty vector able to hold `len` items without growing.
pub(crate) fn try_vec_with_capacity<T>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    Ok(v)
}

/// Allocates a zero-filled byte buffer of `len` octets.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut v = try_vec_with_capacity(len)?;
    v.resize(len, 0);
    Ok(v)
}
