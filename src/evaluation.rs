//! Helpers for inspecting a finished clustering.

use crate::error::{KMeansError, Result};

/// Group observation indices by cluster.
///
/// `members[c]` holds, in ascending order, every `i` with `labels[i] == c`.
pub fn cluster_members(labels: &[usize], k: usize) -> Result<Vec<Vec<usize>>> {
    let mut members = vec![Vec::new(); k];

    for (i, &label) in labels.iter().enumerate() {
        let cluster = members.get_mut(label).ok_or_else(|| {
            KMeansError::InvalidK(format!(
                "label {} at position {} is out of range for k = {}",
                label, i, k
            ))
        })?;
        cluster.push(i);
    }

    Ok(members)
}

/// Number of unordered pairs among `n` items
fn pairs(n: u64) -> u64 {
    n * n.saturating_sub(1) / 2
}

/// Pair-counting Jaccard index between a reference labeling and a computed one.
///
/// Counts pairs of observations placed together by both labelings, divided by
/// pairs placed together by at least one of them. Returns 1.0 for identical
/// partitions (up to renaming of clusters).
pub fn jaccard_measure(real: &[usize], empirical: &[usize], k: usize) -> Result<f64> {
    if real.len() != empirical.len() {
        return Err(KMeansError::InvalidDimensions(format!(
            "labelings have different lengths ({} vs {})",
            real.len(),
            empirical.len()
        )));
    }

    let real_members = cluster_members(real, k)?;
    let empirical_members = cluster_members(empirical, k)?;

    let mut together_in_both = 0u64;
    let mut counts = vec![0u64; k];
    for cluster in &real_members {
        counts.iter_mut().for_each(|c| *c = 0);
        for &i in cluster {
            counts[empirical[i]] += 1;
        }
        together_in_both += counts.iter().map(|&c| pairs(c)).sum::<u64>();
    }

    let together_in_real: u64 = real_members.iter().map(|c| pairs(c.len() as u64)).sum();
    let together_in_empirical: u64 = empirical_members
        .iter()
        .map(|c| pairs(c.len() as u64))
        .sum();

    let together_in_either = together_in_real + together_in_empirical - together_in_both;
    if together_in_either == 0 {
        return Err(KMeansError::InsufficientData(
            "no pair of observations shares a cluster in either labeling".to_string(),
        ));
    }

    Ok(together_in_both as f64 / together_in_either as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cluster_members() {
        let labels = [1, 0, 1, 2, 0];
        let members = cluster_members(&labels, 4).unwrap();

        assert_eq!(members, vec![vec![1, 4], vec![0, 2], vec![3], vec![]]);
    }

    #[test]
    fn test_cluster_members_label_out_of_range() {
        let result = cluster_members(&[0, 3], 2);
        assert!(matches!(result, Err(KMeansError::InvalidK(_))));
    }

    #[test]
    fn test_jaccard_identical_partitions() {
        let real = [0, 0, 1, 1, 2];
        let renamed = [2, 2, 0, 0, 1];

        assert_relative_eq!(jaccard_measure(&real, &real, 3).unwrap(), 1.0);
        assert_relative_eq!(jaccard_measure(&real, &renamed, 3).unwrap(), 1.0);
    }

    #[test]
    fn test_jaccard_disjoint_pairs() {
        let real = [0, 0, 1, 1];
        let empirical = [0, 1, 0, 1];

        assert_relative_eq!(jaccard_measure(&real, &empirical, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        // both: {0,1}; real only: {0,2},{1,2}; empirical only: {2,3}
        let real = [0, 0, 0, 1];
        let empirical = [0, 0, 1, 1];

        assert_relative_eq!(jaccard_measure(&real, &empirical, 2).unwrap(), 0.25);
    }

    #[test]
    fn test_jaccard_errors() {
        assert!(matches!(
            jaccard_measure(&[0, 1], &[0], 2),
            Err(KMeansError::InvalidDimensions(_))
        ));
        assert!(matches!(
            jaccard_measure(&[0, 1], &[1, 0], 2),
            Err(KMeansError::InsufficientData(_))
        ));
    }
}
