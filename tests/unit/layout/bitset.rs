//! Tests for `CandidateSet` operations

#[cfg(test)]
mod tests {
    use tilesmith::layout::bitset::CandidateSet;

    // Verifies a new set is empty and `all` is full
    // Verified by initializing new sets with all bits set
    #[test]
    fn test_new_and_all() {
        let empty = CandidateSet::new(6);
        assert!(empty.is_empty());
        assert_eq!(empty.count(), 0);

        let full = CandidateSet::all(6);
        assert_eq!(full.count(), 6);
        assert_eq!(full.to_vec(), vec![0, 1, 2, 3, 4, 5]);
    }

    // Tests insertion is 0-based and ignores out-of-range indices
    // Verified by shifting indices by one as in 1-based sets
    #[test]
    fn test_insert_and_contains() {
        let mut set = CandidateSet::new(4);
        set.insert(0);
        set.insert(3);
        set.insert(9);
        assert!(set.contains(0));
        assert!(set.contains(3));
        assert!(!set.contains(1));
        assert!(!set.contains(9));
        assert_eq!(set.count(), 2);
    }

    // Tests intersection keeps shared members only
    // Verified by changing intersection to union
    #[test]
    fn test_intersection() {
        let a = CandidateSet::from_indices([0, 2, 4], 8);
        let b = CandidateSet::from_indices([2, 4, 6], 8);
        assert_eq!(a.intersection(&b).to_vec(), vec![2, 4]);

        let mut c = a.clone();
        c.intersect_with(&CandidateSet::from_indices([1, 3], 8));
        assert!(c.is_empty());
        assert_eq!(a.count(), 3, "intersection must not modify the source");
    }

    // Tests display lists members
    // Verified by printing the raw bit count only
    #[test]
    fn test_display() {
        let set = CandidateSet::from_indices([1, 5], 6);
        assert_eq!(set.to_string(), "CandidateSet(2 tiles: [1, 5])");
    }
}
