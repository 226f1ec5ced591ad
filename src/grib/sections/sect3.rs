/// The grid definition paired with a data section.
///
/// Only the template number and its values are carried; decoding Section 3
/// itself is left to the message reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridDefinition {
    /// Grid Definition Template Number
    pub template_number: u16,
    /// Entries of Grid Definition Template 3.N, in template order
    pub values: Vec<i64>,
}

impl GridDefinition {
    pub fn new(template_number: u16, values: Vec<i64>) -> Self {
        Self {
            template_number,
            values,
        }
    }

    /// Spherical harmonic grids (3.50 to 3.53).
    pub fn is_spectral(&self) -> bool {
        (50..=53).contains(&self.template_number)
    }

    /// Pentagonal resolution parameters J, K and M of a spherical harmonic grid.
    pub fn truncation(&self) -> Option<SpectralTruncation> {
        if !self.is_spectral() {
            return None;
        }
        match self.values[..] {
            [j, k, m, ..] => Some(SpectralTruncation { j, k, m }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralTruncation {
    pub j: i64,
    pub k: i64,
    pub m: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_needs_a_spectral_template() {
        assert_eq!(GridDefinition::new(0, vec![1, 2, 3]).truncation(), None);
        assert_eq!(GridDefinition::new(50, vec![1, 2]).truncation(), None);
        assert_eq!(
            GridDefinition::new(51, vec![10, 20, 30, 1]).truncation(),
            Some(SpectralTruncation { j: 10, k: 20, m: 30 })
        );
    }
}
