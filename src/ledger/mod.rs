//! Inventory ledger helpers
//!
//! Pure delta computation between an old and a new set of loan/log items,
//! grouped by catalog. The repositories translate these deltas into
//! conditional counter updates inside their transactions.

use std::collections::BTreeMap;

/// Quantity delta per catalog between two item sets.
///
/// `add` holds catalogs where the new set references more copies than the
/// old one, `release` catalogs where it references fewer. A catalog with an
/// equal count in both sets appears in neither map.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogDelta {
    pub add: BTreeMap<i32, i64>,
    pub release: BTreeMap<i32, i64>,
}

impl CatalogDelta {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.release.is_empty()
    }

    /// Net change per catalog (`new - old`), covering both maps.
    pub fn net(&self) -> BTreeMap<i32, i64> {
        let mut out = BTreeMap::new();
        for (&catalog_id, &n) in &self.add {
            *out.entry(catalog_id).or_insert(0) += n;
        }
        for (&catalog_id, &n) in &self.release {
            *out.entry(catalog_id).or_insert(0) -= n;
        }
        out
    }
}

/// Group catalog ids into a count map.
pub fn count_by_catalog(catalog_ids: &[i32]) -> BTreeMap<i32, i64> {
    let mut counts = BTreeMap::new();
    for &catalog_id in catalog_ids {
        *counts.entry(catalog_id).or_insert(0) += 1;
    }
    counts
}

/// Compute the per-catalog quantity delta between an old and a new item set.
pub fn delta_by_catalog(old: &[i32], new: &[i32]) -> CatalogDelta {
    let old_counts = count_by_catalog(old);
    let new_counts = count_by_catalog(new);

    let mut delta = CatalogDelta::default();
    for (&catalog_id, &n) in &new_counts {
        let o = old_counts.get(&catalog_id).copied().unwrap_or(0);
        if n > o {
            delta.add.insert(catalog_id, n - o);
        }
    }
    for (&catalog_id, &o) in &old_counts {
        let n = new_counts.get(&catalog_id).copied().unwrap_or(0);
        if o > n {
            delta.release.insert(catalog_id, o - n);
        }
    }
    delta
}

/// Ids present in `new` but not in `old`.
pub fn added_ids(old: &[i32], new: &[i32]) -> Vec<i32> {
    new.iter()
        .filter(|id| !old.contains(id))
        .copied()
        .collect()
}

/// Ids present in `old` but not in `new`.
pub fn removed_ids(old: &[i32], new: &[i32]) -> Vec<i32> {
    added_ids(new, old)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_empty_sets() {
        assert!(delta_by_catalog(&[], &[]).is_empty());
    }

    #[test]
    fn test_delta_equal_sets_produce_no_entries() {
        let delta = delta_by_catalog(&[1, 1, 2], &[2, 1, 1]);
        assert!(delta.is_empty());
    }

    #[test]
    fn test_delta_pure_borrow() {
        let delta = delta_by_catalog(&[], &[7, 7, 9]);
        assert_eq!(delta.add.get(&7), Some(&2));
        assert_eq!(delta.add.get(&9), Some(&1));
        assert!(delta.release.is_empty());
    }

    #[test]
    fn test_delta_pure_release() {
        let delta = delta_by_catalog(&[7, 7, 9], &[]);
        assert!(delta.add.is_empty());
        assert_eq!(delta.release.get(&7), Some(&2));
        assert_eq!(delta.release.get(&9), Some(&1));
    }

    #[test]
    fn test_delta_swap_one_item_across_catalogs() {
        // Loan had {book in catalog 2, book in catalog 3}, edited to
        // {book in catalog 2, book in catalog 4}.
        let delta = delta_by_catalog(&[2, 3], &[2, 4]);
        assert_eq!(delta.add.get(&4), Some(&1));
        assert_eq!(delta.release.get(&3), Some(&1));
        assert_eq!(delta.add.get(&2), None);
        assert_eq!(delta.release.get(&2), None);
    }

    #[test]
    fn test_delta_net() {
        let delta = delta_by_catalog(&[1, 1, 2], &[1, 3, 3]);
        let net = delta.net();
        assert_eq!(net.get(&1), Some(&-1));
        assert_eq!(net.get(&2), Some(&-1));
        assert_eq!(net.get(&3), Some(&2));
    }

    #[test]
    fn test_added_and_removed_ids() {
        assert_eq!(added_ids(&[10, 11], &[11, 12]), vec![12]);
        assert_eq!(removed_ids(&[10, 11], &[11, 12]), vec![10]);
        assert!(added_ids(&[10], &[10]).is_empty());
    }
}
