use super::types::{Candidate, Strategy};

/// Absolute distance from the median, in percentage points, beyond which a
/// value is treated as an outlier. Tuned by hand against real filings.
pub const TOLERANCE: f64 = 5.0;

pub const CONSENSUS_CONTEXT: &str = "high-confidence consensus value";

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median of the values that sit within `TOLERANCE` of the overall median.
pub fn reduce(values: &[f64]) -> Option<f64> {
    let center = median(values)?;
    let retained: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| (v - center).abs() <= TOLERANCE)
        .collect();
    median(&retained)
}

pub fn consensus_candidate(values: &[f64]) -> Option<Candidate> {
    let value = reduce(values)?;
    Candidate::new(value, Strategy::Consensus, CONSENSUS_CONTEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_has_no_consensus() {
        assert_eq!(reduce(&[]), None);
    }

    #[test]
    fn test_outlier_is_rejected() {
        // median 95; 40 is 55 away; retained {95, 96} -> 95.5
        assert_eq!(reduce(&[95.0, 96.0, 40.0]), Some(95.5));
    }

    #[test]
    fn test_no_agreement_means_no_consensus() {
        // median 75 sits 15 away from both values
        assert_eq!(reduce(&[60.0, 90.0]), None);
    }

    #[test]
    fn test_single_value_is_its_own_consensus() {
        assert_eq!(reduce(&[93.2]), Some(93.2));
    }

    #[test]
    fn test_reduction_is_deterministic() {
        let values = [91.0, 97.5, 60.0, 94.0, 95.5, 99.9];
        let first = reduce(&values);
        assert_eq!(first, reduce(&values));

        let mut shuffled = values;
        shuffled.reverse();
        assert_eq!(first, reduce(&shuffled));
    }

    #[test]
    fn test_boundary_tolerance_is_inclusive() {
        // median 95; 90 and 100 are exactly 5 away
        assert_eq!(reduce(&[90.0, 95.0, 100.0]), Some(95.0));
    }

    #[test]
    fn test_candidate_is_labelled() {
        let candidate = consensus_candidate(&[94.0, 96.0]).unwrap();
        assert_eq!(candidate.value(), 95.0);
        assert_eq!(candidate.strategy, Strategy::Consensus);
        assert_eq!(candidate.context, CONSENSUS_CONTEXT);
    }
}
