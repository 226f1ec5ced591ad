//! Product Definition Templates (Section 4).
//!
//! Most templates share a "horizontal level" prefix, and the statistically
//! processed ones end with the same end-of-interval block, so both are
//! spelled out once and concatenated at compile time.

use crate::grib::templates::{Extension, TemplateCategory, TemplateDescriptor};

const fn pds(number: u16, widths: &'static [i8], needs_extension: bool) -> TemplateDescriptor {
    TemplateDescriptor {
        category: TemplateCategory::ProductDefinition,
        number,
        widths,
        needs_extension,
    }
}

/// Concatenates octet maps into a `&'static [i8]`.
macro_rules! octets {
    ($($part:expr),+ $(,)?) => {{
        const LEN: usize = 0 $(+ $part.len())+;
        const MAP: [i8; LEN] = {
            let mut map = [0i8; LEN];
            let mut at = 0;
            $(
                let part: &[i8] = $part;
                let mut i = 0;
                while i < part.len() {
                    map[at] = part[i];
                    at += 1;
                    i += 1;
                }
            )+
            let _ = at;
            map
        };
        &MAP
    }};
}

/// Parameter, generating process, forecast time and the two fixed surfaces.
const HORIZONTAL: &[i8] = &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4];
/// End of the overall interval, the number of time ranges, missing values,
/// then one 6-entry time range specification.
const INTERVAL: &[i8] = &[2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4];
const ENSEMBLE: &[i8] = &[1, 1, 1];
const DERIVED: &[i8] = &[1, 1];
const PROBABILITY: &[i8] = &[1, 1, 1, -1, -4, -1, -4];
const CLUSTER_RECTANGLE: &[i8] = &[1, 1, 1, 1, 1, 1, 1, -4, -4, 4, 4, 1, -1, 4, -1, 4];
const CLUSTER_CIRCLE: &[i8] = &[1, 1, 1, 1, 1, 1, 1, -4, 4, 4, 1, -1, 4, -1, 4];
const SATELLITE: &[i8] = &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1];
const SATELLITE_BAND: &[i8] = &[2, 2, 2, -1, -4];
const CHEMICAL: &[i8] = &[1, 1, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4];
const AEROSOL: &[i8] = &[1, 1, 2, 1, -1, -4, -1, -4, 1, 1, 1, 2, 1, 1, -2, 1, -1, -4, 1, -1, -4];
const PARTITIONED: &[i8] = &[1, 1, 1, 1, 4, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4];
const REFORECAST: &[i8] = &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 2, 1, 1, 1, 1, 1];

pub(crate) static TEMPLATES: &[TemplateDescriptor] = &[
    // 4.0: Analysis or forecast at a horizontal level at a point in time
    pds(0, HORIZONTAL, false),
    // 4.1: Individual ensemble forecast
    pds(1, octets!(HORIZONTAL, ENSEMBLE), false),
    // 4.2: Derived forecast based on all ensemble members
    pds(2, octets!(HORIZONTAL, DERIVED), false),
    // 4.3: Derived forecasts based on a cluster over a rectangular area
    pds(3, octets!(HORIZONTAL, CLUSTER_RECTANGLE), true),
    // 4.4: Derived forecasts based on a cluster over a circular area
    pds(4, octets!(HORIZONTAL, CLUSTER_CIRCLE), true),
    // 4.5: Probability forecasts
    pds(5, octets!(HORIZONTAL, PROBABILITY), false),
    // 4.6: Percentile forecasts
    pds(6, octets!(HORIZONTAL, &[1]), false),
    // 4.7: Analysis or forecast error
    pds(7, HORIZONTAL, false),
    // 4.8: Average, accumulation or extreme values over a time interval
    pds(8, octets!(HORIZONTAL, INTERVAL), true),
    // 4.9: Probability forecasts over a time interval
    pds(9, octets!(HORIZONTAL, PROBABILITY, INTERVAL), true),
    // 4.10: Percentile forecasts over a time interval
    pds(10, octets!(HORIZONTAL, &[1], INTERVAL), true),
    // 4.11: Individual ensemble forecast over a time interval
    pds(11, octets!(HORIZONTAL, ENSEMBLE, INTERVAL), true),
    // 4.12: Derived forecast on all ensemble members over a time interval
    pds(12, octets!(HORIZONTAL, DERIVED, INTERVAL), true),
    // 4.13: Derived forecasts on a rectangular cluster over a time interval
    pds(13, octets!(HORIZONTAL, CLUSTER_RECTANGLE, INTERVAL), true),
    // 4.14: Derived forecasts on a circular cluster over a time interval
    pds(14, octets!(HORIZONTAL, CLUSTER_CIRCLE, INTERVAL), true),
    // 4.15: Average, accumulation or extreme values over a spatial area
    pds(15, octets!(HORIZONTAL, &[1, 1, 1]), false),
    // 4.20: Radar product
    pds(20, &[1, 1, 1, 1, 1, -4, 4, 2, 4, 2, 1, 1, 1, 1, 1, 2, 1, 3, 2], false),
    // 4.30: Satellite product (deprecated)
    pds(30, &[1, 1, 1, 1, 1], true),
    // 4.31: Satellite product
    pds(31, &[1, 1, 1, 1, 1], true),
    // 4.32: Simulated satellite product
    pds(32, SATELLITE, true),
    // 4.33: Individual ensemble forecast for simulated satellite data
    pds(33, octets!(SATELLITE, SATELLITE_BAND, ENSEMBLE), true),
    // 4.34: As 4.33, over a time interval
    pds(34, octets!(SATELLITE, SATELLITE_BAND, ENSEMBLE, INTERVAL), true),
    // 4.40: Atmospheric chemical constituents
    pds(40, CHEMICAL, false),
    // 4.41: Individual ensemble forecast for chemical constituents
    pds(41, octets!(CHEMICAL, ENSEMBLE), false),
    // 4.42: Chemical constituents over a time interval
    pds(42, octets!(CHEMICAL, INTERVAL), true),
    // 4.43: Individual ensemble forecast for chemical constituents over a time interval
    pds(43, octets!(CHEMICAL, ENSEMBLE, INTERVAL), true),
    // 4.44: Aerosol
    pds(44, AEROSOL, false),
    // 4.45: Individual ensemble forecast for aerosol
    pds(45, octets!(AEROSOL, ENSEMBLE), false),
    // 4.46: Aerosol over a time interval
    pds(46, octets!(AEROSOL, INTERVAL), true),
    // 4.47: Individual ensemble forecast for aerosol over a time interval
    pds(47, octets!(AEROSOL, ENSEMBLE, INTERVAL), true),
    // 4.48: Optical properties of aerosol
    pds(48, &[1, 1, 2, 1, -1, -4, -1, -4, 1, -1, -4, -1, -4, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4], false),
    // 4.50: Analysis or forecast of a multi component parameter
    pds(50, octets!(HORIZONTAL, &[1, 1, 4, 4, 4, 4]), false),
    // 4.51: Categorical forecast
    pds(51, octets!(HORIZONTAL, &[1]), true),
    // 4.52: Lateral boundary condition on a horizontal level
    pds(52, &[1, 1, 1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, -2], false),
    // 4.53: Partitioned parameters
    pds(53, PARTITIONED, true),
    // 4.54: Individual ensemble forecast for partitioned parameters
    pds(54, octets!(PARTITIONED, ENSEMBLE), true),
    // 4.57: Chemical constituents based on a distribution function
    pds(57, &[1, 1, 2, 2, 2, 2, 1], true),
    // 4.60: Individual ensemble reforecast
    pds(60, REFORECAST, false),
    // 4.61: Individual ensemble reforecast over a time interval
    pds(61, octets!(REFORECAST, INTERVAL), true),
    // 4.91: Categorical forecast over a time interval
    pds(91, octets!(HORIZONTAL, &[1, 1, 1, -1, -4, -1, -4], INTERVAL), true),
    // 4.254: CCITT IA5 character string
    pds(254, &[1, 1, 4], false),
    // 4.1000: Cross section of analysis or forecast at a point in time
    pds(1000, &[1, 1, 1, 1, 1, 2, 1, 1, -4], false),
    // 4.1001: Cross section averaged over a time interval
    pds(1001, &[1, 1, 1, 1, 1, 2, 1, 1, 4, 4, 1, 1, 1, 4, 1, 4], false),
    // 4.1002: Cross section processed over longitude
    pds(1002, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, 1, 4], false),
    // 4.1100: Hovmoller-type grid, no averaging
    pds(1100, HORIZONTAL, false),
    // 4.1101: Hovmoller-type grid averaged over a time interval
    pds(1101, octets!(HORIZONTAL, &[4, 1, 1, 1, 4, 1, 4]), false),
];

/// How each extensible template grows, keyed by template number.
pub(crate) static EXTENSIONS: &[(u16, Extension)] = &[
    (3, Extension::Scalars { count_at: 26 }),
    (4, Extension::Scalars { count_at: 25 }),
    (8, Extension::Repeat { count_at: 21, record_at: 23, trailing_at: None }),
    (9, Extension::Repeat { count_at: 28, record_at: 30, trailing_at: None }),
    (10, Extension::Repeat { count_at: 22, record_at: 24, trailing_at: None }),
    (11, Extension::Repeat { count_at: 24, record_at: 26, trailing_at: None }),
    (12, Extension::Repeat { count_at: 23, record_at: 25, trailing_at: None }),
    (13, Extension::Repeat { count_at: 37, record_at: 39, trailing_at: Some(26) }),
    (14, Extension::Repeat { count_at: 36, record_at: 38, trailing_at: Some(25) }),
    (30, Extension::Records { count_at: 4, record: &[2, 2, 1, 1, 4] }),
    (31, Extension::Records { count_at: 4, record: &[2, 2, 2, 1, 4] }),
    (32, Extension::Records { count_at: 9, record: SATELLITE_BAND }),
    (33, Extension::Scalars { count_at: 9 }),
    (34, Extension::Repeat { count_at: 24, record_at: 26, trailing_at: Some(9) }),
    (42, Extension::Repeat { count_at: 22, record_at: 24, trailing_at: None }),
    (43, Extension::Repeat { count_at: 25, record_at: 27, trailing_at: None }),
    (46, Extension::Repeat { count_at: 27, record_at: 29, trailing_at: None }),
    (47, Extension::Repeat { count_at: 30, record_at: 32, trailing_at: None }),
    (51, Extension::Records { count_at: 15, record: &[1, 1, -1, -4, -1, -4] }),
    (53, Extension::Scalars { count_at: 3 }),
    (54, Extension::Scalars { count_at: 3 }),
    (57, Extension::Records {
        count_at: 6,
        record: &[1, -4, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4],
    }),
    (61, Extension::Repeat { count_at: 30, record_at: 32, trailing_at: None }),
    (91, Extension::Repeat { count_at: 28, record_at: 30, trailing_at: Some(15) }),
];

#[cfg(test)]
mod tests {
    use super::*;

    /// Fully expanded octet maps, one per registered template.
    #[rustfmt::skip]
    const SNAPSHOT: &[(u16, &[i8])] = &[
        (0, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4]),
        (1, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1]),
        (2, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1]),
        (3, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 1, 1, 1, 1, -4, -4, 4, 4, 1, -1, 4, -1, 4]),
        (4, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 1, 1, 1, 1, -4, 4, 4, 1, -1, 4, -1, 4]),
        (5, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, -1, -4, -1, -4]),
        (6, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1]),
        (7, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4]),
        (8, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (9, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, -1, -4, -1, -4, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (10, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (11, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (12, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (13, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 1, 1, 1, 1, -4, -4, 4, 4, 1, -1, 4, -1, 4, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (14, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 1, 1, 1, 1, -4, 4, 4, 1, -1, 4, -1, 4, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (15, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1]),
        (20, &[1, 1, 1, 1, 1, -4, 4, 2, 4, 2, 1, 1, 1, 1, 1, 2, 1, 3, 2]),
        (30, &[1, 1, 1, 1, 1]),
        (31, &[1, 1, 1, 1, 1]),
        (32, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1]),
        (33, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, 2, 2, 2, -1, -4, 1, 1, 1]),
        (34, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, 2, 2, 2, -1, -4, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (40, &[1, 1, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4]),
        (41, &[1, 1, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1]),
        (42, &[1, 1, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (43, &[1, 1, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (44, &[1, 1, 2, 1, -1, -4, -1, -4, 1, 1, 1, 2, 1, 1, -2, 1, -1, -4, 1, -1, -4]),
        (45, &[1, 1, 2, 1, -1, -4, -1, -4, 1, 1, 1, 2, 1, 1, -2, 1, -1, -4, 1, -1, -4, 1, 1, 1]),
        (46, &[1, 1, 2, 1, -1, -4, -1, -4, 1, 1, 1, 2, 1, 1, -2, 1, -1, -4, 1, -1, -4, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (47, &[1, 1, 2, 1, -1, -4, -1, -4, 1, 1, 1, 2, 1, 1, -2, 1, -1, -4, 1, -1, -4, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (48, &[1, 1, 2, 1, -1, -4, -1, -4, 1, -1, -4, -1, -4, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4]),
        (50, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 4, 4, 4, 4]),
        (51, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1]),
        (52, &[1, 1, 1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, -2]),
        (53, &[1, 1, 1, 1, 4, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4]),
        (54, &[1, 1, 1, 1, 4, 2, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1]),
        (57, &[1, 1, 2, 2, 2, 2, 1]),
        (60, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 2, 1, 1, 1, 1, 1]),
        (61, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, 2, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (91, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 1, 1, 1, -1, -4, -1, -4, 2, 1, 1, 1, 1, 1, 1, 4, 1, 1, 1, 4, 1, 4]),
        (254, &[1, 1, 4]),
        (1000, &[1, 1, 1, 1, 1, 2, 1, 1, -4]),
        (1001, &[1, 1, 1, 1, 1, 2, 1, 1, 4, 4, 1, 1, 1, 4, 1, 4]),
        (1002, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, 1, 4]),
        (1100, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4]),
        (1101, &[1, 1, 1, 1, 1, 2, 1, 1, -4, 1, -1, -4, 1, -1, -4, 4, 1, 1, 1, 4, 1, 4]),
    ];

    #[test]
    fn octet_maps_are_pinned() {
        assert_eq!(TEMPLATES.len(), SNAPSHOT.len());
        for (t, (number, widths)) in TEMPLATES.iter().zip(SNAPSHOT) {
            assert_eq!(t.number, *number);
            assert_eq!(t.widths, *widths, "4.{}", number);
        }
    }
}
