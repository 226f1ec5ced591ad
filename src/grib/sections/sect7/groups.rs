use std::iter;
use crate::grib::bits::octet_length;
use crate::grib::sections::sect5::RepresentationParams;
use crate::grib::utils::BitwiseIterator;
use crate::grib::{try_vec_with_capacity, GribError, Result};

/// Group layout of complex packing, positions 9 to 15 of 5.2 and 5.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GroupDefinition {
    pub num_groups: usize,
    pub group_widths_reference: u64,
    pub group_widths_num_bits: usize,
    pub group_lengths_reference: u64,
    pub group_lengths_increment: u64,
    pub group_lengths_last: u64,
    pub group_scaled_lengths_num_bits: usize,
}

fn non_negative(params: &RepresentationParams, index: usize) -> Result<u64> {
    let value = params.get(index)?;
    u64::try_from(value).map_err(|_| {
        GribError::CorruptSection(format!(
            "DRT 5.{} value {} is negative ({})",
            params.template_number(),
            index,
            value
        ))
    })
}

impl GroupDefinition {
    pub(crate) fn from_params(params: &RepresentationParams) -> Result<Self> {
        Ok(Self {
            num_groups: non_negative(params, 9)? as usize,
            group_widths_reference: non_negative(params, 10)?,
            group_widths_num_bits: non_negative(params, 11)? as usize,
            group_lengths_reference: non_negative(params, 12)?,
            group_lengths_increment: non_negative(params, 13)?,
            group_lengths_last: non_negative(params, 14)?,
            group_scaled_lengths_num_bits: non_negative(params, 15)? as usize,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Group {
    pub reference_value: u64,
    pub width: usize,
    pub length: usize,
}

/// Reads `count` values of `num_bits` at the start of `slice`; the block is
/// padded to a whole octet.
fn read_block(slice: &[u8], num_bits: usize, count: usize, what: &str) -> Result<(Vec<u64>, usize)> {
    let mut values = try_vec_with_capacity(count)?;
    values.extend(BitwiseIterator::<u64>::new(slice, num_bits).take(count));
    if values.len() != count {
        return Err(GribError::CorruptSection(format!(
            "{} of {} bits : {} of {} groups available",
            what,
            num_bits,
            values.len(),
            count
        )));
    }
    Ok((values, octet_length(num_bits, count)))
}

/// Decodes the group references, widths and lengths at the start of `slice`.
///
/// Returns the groups and the number of octets the three blocks take.
pub(crate) fn decode(group_definition: &GroupDefinition, references_num_bits: usize, slice: &[u8]) -> Result<(Vec<Group>, usize)> {
    let num_groups = group_definition.num_groups;

    let (references, references_len) = read_block(slice, references_num_bits, num_groups, "Group references")?;

    let widths_start = references_len;
    let (widths, widths_len) = read_block(
        slice.get(widths_start..).unwrap_or(&[]),
        group_definition.group_widths_num_bits,
        num_groups,
        "Group widths",
    )?;

    let lengths_start = widths_start + widths_len;
    let (lengths, lengths_len) = read_block(
        slice.get(lengths_start..).unwrap_or(&[]),
        group_definition.group_scaled_lengths_num_bits,
        num_groups,
        "Group lengths",
    )?;

    let lengths_iter = lengths
        .iter()
        .take(num_groups.saturating_sub(1))
        .map(|v| {
            group_definition
                .group_lengths_increment
                .checked_mul(*v)
                .and_then(|scaled| scaled.checked_add(group_definition.group_lengths_reference))
        })
        .chain(iter::once(Some(group_definition.group_lengths_last)));

    let mut groups = try_vec_with_capacity(num_groups)?;
    for ((reference_value, width), length) in references.iter().zip(&widths).zip(lengths_iter) {
        let width = group_definition.group_widths_reference.saturating_add(*width);
        if width > u64::BITS as u64 {
            return Err(GribError::CorruptSection(format!("Group width of {} bits", width)));
        }
        let length = length
            .and_then(|l| usize::try_from(l).ok())
            .ok_or_else(|| GribError::CorruptSection(String::from("Group length overflows")))?;
        groups.push(Group {
            reference_value: *reference_value,
            width: width as usize,
            length,
        });
    }

    Ok((groups, lengths_start + lengths_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(num_groups: usize) -> GroupDefinition {
        GroupDefinition {
            num_groups,
            group_widths_reference: 1,
            group_widths_num_bits: 2,
            group_lengths_reference: 3,
            group_lengths_increment: 2,
            group_lengths_last: 7,
            group_scaled_lengths_num_bits: 4,
        }
    }

    #[test]
    fn blocks_are_octet_aligned() {
        // references on 5 bits: 1, 2, 3 -> 15 bits, 2 octets
        // widths on 2 bits: 0, 2, 1 -> 1 octet
        // lengths on 4 bits: 1, 4, (ignored) -> 2 octets
        let slice = [0b0000_1000, 0b1000_0110, 0b0010_0100, 0b0001_0100, 0b1111_0000];
        let (groups, len) = decode(&definition(3), 5, &slice).unwrap();
        assert_eq!(len, 5);
        assert_eq!(
            groups,
            [
                Group { reference_value: 1, width: 1, length: 5 },
                Group { reference_value: 2, width: 3, length: 11 },
                Group { reference_value: 3, width: 2, length: 7 },
            ]
        );
    }

    #[test]
    fn zero_bit_blocks_use_the_references() {
        let mut def = definition(2);
        def.group_widths_num_bits = 0;
        def.group_scaled_lengths_num_bits = 0;
        let (groups, len) = decode(&def, 8, &[4, 9]).unwrap();
        assert_eq!(len, 2);
        assert_eq!(groups[0], Group { reference_value: 4, width: 1, length: 3 });
        assert_eq!(groups[1], Group { reference_value: 9, width: 1, length: 7 });
    }

    #[test]
    fn truncated_blocks() {
        assert!(matches!(decode(&definition(3), 5, &[0, 0]), Err(GribError::CorruptSection(_))));

        let mut def = definition(1);
        def.group_widths_reference = 70;
        assert!(matches!(decode(&def, 8, &[0, 0, 0]), Err(GribError::CorruptSection(_))));
    }

    #[test]
    fn oversized_lengths_are_corrupt() {
        let mut def = definition(2);
        def.group_lengths_increment = 2;
        def.group_scaled_lengths_num_bits = 64;
        let mut slice = vec![0; 3];
        slice.extend([0xff; 16]);
        assert!(matches!(decode(&def, 8, &slice), Err(GribError::CorruptSection(_))));
    }

    #[test]
    fn definition_from_params() {
        let mut params = RepresentationParams::for_template(2).unwrap();
        for (index, value) in [(9, 4), (10, 1), (11, 2), (12, 3), (13, 1), (14, 5), (15, 6)] {
            params.set(index, value).unwrap();
        }
        let def = GroupDefinition::from_params(&params).unwrap();
        assert_eq!(def.num_groups, 4);
        assert_eq!(def.group_lengths_last, 5);
        assert_eq!(def.group_scaled_lengths_num_bits, 6);

        params.set(9, -1).unwrap();
        assert!(GroupDefinition::from_params(&params).is_err());
    }
}
