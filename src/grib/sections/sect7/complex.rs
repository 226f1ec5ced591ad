use crate::grib::sections::sect5::{DataRepresentationDefinition, RepresentationParams};
use crate::grib::sections::sect7::complex_spacial_diff::SpatialDifferencing;
use crate::grib::sections::sect7::groups::{self, Group, GroupDefinition};
use crate::grib::sections::sect7::simple::{Scaling, SimpleDecoderIterator};
use crate::grib::sections::sect7::Grib2DataDecoder;
use crate::grib::utils::BitwiseIterator;
use crate::grib::{try_vec_with_capacity, GribError, Result};

/// Missing value management, position 6 of 5.2 and 5.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingValueManagement {
    None,
    Primary,
    PrimaryAndSecondary,
}

impl MissingValueManagement {
    fn from_params(params: &RepresentationParams) -> Result<Self> {
        match params.get(6)? {
            0 => Ok(MissingValueManagement::None),
            1 => Ok(MissingValueManagement::Primary),
            2 => Ok(MissingValueManagement::PrimaryAndSecondary),
            n => Err(GribError::CorruptSection(format!("Missing value management {}", n))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sample {
    Value(i64),
    MissingPrimary,
    MissingSecondary,
}

/// All ones on `nbits`: the primary missing value of a group.
fn all_ones(nbits: usize) -> u64 {
    if nbits >= u64::BITS as usize {
        u64::MAX
    } else {
        (1 << nbits) - 1
    }
}

/// Missing values substitutes are IEEE floats when the original field was,
/// integers otherwise.
fn substitute(params: &RepresentationParams, index: usize) -> Result<f64> {
    let raw = params.get(index)?;
    Ok(if params.original_type()? == 0 {
        f64::from(f32::from_bits(raw as u32))
    } else {
        raw as f64
    })
}

impl Sample {
    fn classify(raw: u64, nbits: usize, missing: MissingValueManagement) -> Option<Sample> {
        match missing {
            MissingValueManagement::None => None,
            _ if raw == all_ones(nbits) => Some(Sample::MissingPrimary),
            MissingValueManagement::PrimaryAndSecondary if raw == all_ones(nbits).wrapping_sub(1) => {
                Some(Sample::MissingSecondary)
            }
            _ => None,
        }
    }
}

/// Reads the group values that follow the group descriptors.
fn unpack_samples(
    groups: &[Group],
    references_num_bits: usize,
    missing: MissingValueManagement,
    slice: &[u8],
    num_points: usize,
) -> Result<Vec<Sample>> {
    let mut samples = try_vec_with_capacity(num_points)?;
    let mut offset = 0;

    for group in groups {
        if group.width == 0 {
            // no bits, every point of the group is the group reference
            let sample = Sample::classify(group.reference_value, references_num_bits, missing)
                .unwrap_or(Sample::Value(group.reference_value as i64));
            samples.resize(samples.len() + group.length, sample);
            continue;
        }

        let start = samples.len();
        samples.extend(
            BitwiseIterator::<u64>::new(slice, group.width)
                .with_offset(offset)
                .take(group.length)
                .map(|v| {
                    Sample::classify(v, group.width, missing)
                        .unwrap_or(Sample::Value(group.reference_value.wrapping_add(v) as i64))
                }),
        );
        if samples.len() - start != group.length {
            return Err(GribError::CorruptSection(format!(
                "Group of {} values on {} bits runs past the section",
                group.length, group.width
            )));
        }
        offset += group.width * group.length;
    }

    Ok(samples)
}

/// Data Representation Templates 5.2 and 5.3
///
/// The field is cut into groups, each with its own reference and bit width.
/// With 5.3 the packed values are first or second order differences.
#[derive(Debug, Default)]
pub struct GridPointDataComplexPackingDecoder {}

impl Grib2DataDecoder for GridPointDataComplexPackingDecoder {
    fn decode(&self, data_repr_def: &DataRepresentationDefinition, slice: &[u8]) -> Result<Box<[f64]>> {
        let params = &data_repr_def.params;
        let num_points = data_repr_def.num_points;

        let spacial_diff = match params.template_number() {
            2 => false,
            3 => true,
            n => return Err(GribError::UnsupportedTemplate(n)),
        };

        let scaling = Scaling::from_params(params)?;
        let references_num_bits = params.num_bits()?;
        let group_definition = GroupDefinition::from_params(params)?;
        let missing = MissingValueManagement::from_params(params)?;

        if group_definition.num_groups == 0 {
            let mut decoded = try_vec_with_capacity(num_points)?;
            decoded.resize(num_points, scaling.reference_value);
            return Ok(decoded.into_boxed_slice());
        }

        let spdiff = if spacial_diff {
            Some(SpatialDifferencing::read(params, slice)?)
        } else {
            None
        };
        let groups_start = spdiff.map_or(0, |sd| sd.header_len);

        let groups_slice = slice.get(groups_start..).unwrap_or(&[]);
        let (groups, groups_num_bytes) = groups::decode(&group_definition, references_num_bits, groups_slice)?;

        let total = groups
            .iter()
            .try_fold(0usize, |total, g| total.checked_add(g.length))
            .ok_or_else(|| GribError::CorruptSection(String::from("Group lengths overflow")))?;
        if total != num_points {
            return Err(GribError::CorruptSection(format!(
                "Groups hold {} values, {} expected",
                total, num_points
            )));
        }

        debug!(
            "Complex packing : {} groups, missing values {:?}, spatial differencing {:?}",
            groups.len(),
            missing,
            spdiff.map(|sd| sd.order)
        );

        let values_slice = groups_slice.get(groups_num_bytes..).unwrap_or(&[]);
        let samples = unpack_samples(&groups, references_num_bits, missing, values_slice, num_points)?;

        let packed = samples.iter().filter_map(|s| match s {
            Sample::Value(v) => Some(*v),
            _ => None,
        });
        let mut values = try_vec_with_capacity(samples.len())?;
        match spdiff {
            Some(sd) => values.extend(sd.undo(packed)),
            None => values.extend(packed),
        }

        let primary = match missing {
            MissingValueManagement::None => 0.0,
            _ => substitute(params, 7)?,
        };
        let secondary = match missing {
            MissingValueManagement::PrimaryAndSecondary => substitute(params, 8)?,
            _ => 0.0,
        };

        let mut scaled = SimpleDecoderIterator::new(values.into_iter(), scaling);
        let mut decoded = try_vec_with_capacity(num_points)?;
        for sample in &samples {
            decoded.push(match sample {
                Sample::Value(_) => scaled
                    .next()
                    .ok_or_else(|| GribError::DecodeFailure(String::from("Length Mismatch")))?,
                Sample::MissingPrimary => primary,
                Sample::MissingSecondary => secondary,
            });
        }

        Ok(decoded.into_boxed_slice())
    }
}
