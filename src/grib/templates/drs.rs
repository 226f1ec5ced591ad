//! Data Representation Templates (Section 5).
//!
//! Widths are octet counts; a negative width marks an entry that may hold a
//! sign-magnitude negative value.

use crate::grib::templates::{TemplateCategory, TemplateDescriptor};

const fn drs(number: u16, widths: &'static [i8]) -> TemplateDescriptor {
    TemplateDescriptor {
        category: TemplateCategory::DataRepresentation,
        number,
        widths,
        needs_extension: false,
    }
}

// 5.1 (matrix values, simple packing) was never validated and is left out.
pub(crate) static TEMPLATES: &[TemplateDescriptor] = &[
    // 5.0: Grid point data - Simple Packing
    drs(0, &[4, -2, -2, 1, 1]),
    // 5.2: Grid point data - Complex Packing
    drs(2, &[4, -2, -2, 1, 1, 1, 1, 4, 4, 4, 1, 1, 4, 1, 4, 1]),
    // 5.3: Grid point data - Complex Packing and spatial differencing
    drs(3, &[4, -2, -2, 1, 1, 1, 1, 4, 4, 4, 1, 1, 4, 1, 4, 1, 1, 1]),
    // 5.50: Spectral Data - Simple Packing
    drs(50, &[4, -2, -2, 1, 4]),
    // 5.51: Spherical Harmonics data - Complex packing
    drs(51, &[4, -2, -2, 1, -4, 2, 2, 2, 4, 1]),
    // 5.40: Grid point data - JPEG2000 encoding
    drs(40, &[4, -2, -2, 1, 1, 1, 1]),
    // 5.41: Grid point data - PNG encoding
    drs(41, &[4, -2, -2, 1, 1]),
    // 5.40000: local JPEG2000 number predating 5.40
    drs(40000, &[4, -2, -2, 1, 1, 1, 1]),
    // 5.40010: local PNG number predating 5.41
    drs(40010, &[4, -2, -2, 1, 1]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const SNAPSHOT: &[(u16, &[i8])] = &[
        (0, &[4, -2, -2, 1, 1]),
        (2, &[4, -2, -2, 1, 1, 1, 1, 4, 4, 4, 1, 1, 4, 1, 4, 1]),
        (3, &[4, -2, -2, 1, 1, 1, 1, 4, 4, 4, 1, 1, 4, 1, 4, 1, 1, 1]),
        (50, &[4, -2, -2, 1, 4]),
        (51, &[4, -2, -2, 1, -4, 2, 2, 2, 4, 1]),
        (40, &[4, -2, -2, 1, 1, 1, 1]),
        (41, &[4, -2, -2, 1, 1]),
        (40000, &[4, -2, -2, 1, 1, 1, 1]),
        (40010, &[4, -2, -2, 1, 1]),
    ];

    #[test]
    fn octet_maps_are_pinned() {
        let registered: Vec<(u16, &[i8])> = TEMPLATES.iter().map(|t| (t.number, t.widths)).collect();
        assert_eq!(registered, SNAPSHOT);
    }
}
