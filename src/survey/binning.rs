//! Equal-width binning of `job_prestige` into six ordered levels.
//!
//! Bins are right-closed, `(e[i], e[i+1]]`. The lowest edge sits 0.1% of
//! the range below the observed minimum so the minimum lands in level 1.

use crate::survey::types::{PrestigeLevel, SurveyTable};

const EDGE_COUNT: usize = PrestigeLevel::COUNT + 1;

/// Data-dependent bin edges for [`PrestigeLevel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrestigeBins {
    edges: [f64; EDGE_COUNT],
}

impl PrestigeBins {
    /// Builds bins over the finite values yielded by `values`.
    /// Returns `None` when there is nothing to bin.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        let mut edges = [0.0; EDGE_COUNT];

        if min == max {
            let pad = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
            Self::spread(&mut edges, min - pad, max + pad);
        } else {
            Self::spread(&mut edges, min, max);
            edges[0] -= (max - min) * 0.001;
        }

        Some(Self { edges })
    }

    /// Bins over the non-missing `job_prestige` of the whole table.
    pub fn from_table(table: &SurveyTable) -> Option<Self> {
        Self::from_values(table.iter().filter_map(|r| r.job_prestige))
    }

    fn spread(edges: &mut [f64; EDGE_COUNT], lo: f64, hi: f64) {
        let step = (hi - lo) / PrestigeLevel::COUNT as f64;
        for (k, edge) in edges.iter_mut().enumerate() {
            *edge = lo + step * k as f64;
        }
        edges[EDGE_COUNT - 1] = hi;
    }

    pub fn edges(&self) -> [f64; EDGE_COUNT] {
        self.edges
    }

    /// Level for `value`, or `None` outside `(e[0], e[6]]`.
    pub fn level(&self, value: f64) -> Option<PrestigeLevel> {
        if !value.is_finite() {
            return None;
        }
        let upper = self.edges.partition_point(|&e| e < value);
        if upper == 0 || upper >= EDGE_COUNT {
            return None;
        }
        PrestigeLevel::new(upper as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::types::SurveyRecord;

    fn level_numbers(bins: &PrestigeBins, values: &[f64]) -> Vec<Option<u8>> {
        values
            .iter()
            .map(|&v| bins.level(v).map(PrestigeLevel::number))
            .collect()
    }

    #[test]
    fn test_six_equal_width_bins() {
        let bins = PrestigeBins::from_values([16.0, 80.0]).unwrap();
        let edges = bins.edges();

        assert_eq!(edges.len(), 7);
        assert!((edges[0] - (16.0 - 0.064)).abs() < 1e-9);
        assert_eq!(edges[6], 80.0);
        for k in 1..6 {
            let expected = 16.0 + (64.0 / 6.0) * k as f64;
            assert!((edges[k] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_levels_are_right_closed() {
        let bins = PrestigeBins::from_values([0.0, 60.0]).unwrap();
        // edges: -0.06, 10, 20, 30, 40, 50, 60
        assert_eq!(
            level_numbers(&bins, &[0.0, 10.0, 10.5, 30.0, 59.9, 60.0]),
            vec![Some(1), Some(1), Some(2), Some(3), Some(6), Some(6)]
        );
    }

    #[test]
    fn test_out_of_range_is_undefined() {
        let bins = PrestigeBins::from_values([0.0, 60.0]).unwrap();
        assert_eq!(bins.level(60.5), None);
        assert_eq!(bins.level(-1.0), None);
        assert_eq!(bins.level(f64::NAN), None);
    }

    #[test]
    fn test_no_values_no_bins() {
        assert_eq!(PrestigeBins::from_values(Vec::<f64>::new()), None);
        assert_eq!(PrestigeBins::from_values([f64::NAN]), None);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let bins = PrestigeBins::from_values([50.0, 50.0]).unwrap();
        let edges = bins.edges();
        assert!((edges[0] - 49.95).abs() < 1e-9);
        assert!((edges[6] - 50.05).abs() < 1e-9);
        assert!(bins.level(50.0).is_some());

        let zero = PrestigeBins::from_values([0.0]).unwrap();
        assert!((zero.edges()[6] - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_binning_is_deterministic() {
        let values = [16.0, 22.0, 35.0, 47.0, 51.0, 63.0, 80.0, 28.5];
        let a = PrestigeBins::from_values(values).unwrap();
        let b = PrestigeBins::from_values(values).unwrap();

        assert_eq!(a.edges(), b.edges());
        assert_eq!(level_numbers(&a, &values), level_numbers(&b, &values));
    }

    #[test]
    fn test_from_table_ignores_missing() {
        let table = SurveyTable::from_records(vec![
            SurveyRecord {
                job_prestige: Some(20.0),
                ..Default::default()
            },
            SurveyRecord::default(),
            SurveyRecord {
                job_prestige: Some(80.0),
                ..Default::default()
            },
        ]);
        let bins = PrestigeBins::from_table(&table).unwrap();
        assert_eq!(bins.edges()[6], 80.0);
        assert_eq!(bins.level(20.0).map(PrestigeLevel::number), Some(1));
    }
}
