#[cfg(test)]
mod tests {
    use crate::orchard::error::OrchardError;
    use crate::orchard::neighbors::find_nearest;
    use crate::orchard::testutil::offset;

    #[test]
    fn test_nearest_sorted_without_self_or_duplicates() {
        let trees = vec![
            offset(0.0, 0.0),
            offset(3.0, 0.0),
            offset(0.0, 1.0),
            offset(0.0, 0.0),
            offset(5.0, 5.0),
            offset(-2.0, 0.0),
        ];

        assert_eq!(find_nearest(0, &trees, 3).unwrap(), vec![2, 5, 1]);
        assert_eq!(find_nearest(0, &trees, 4).unwrap(), vec![2, 5, 1, 4]);
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let trees = vec![
            offset(0.0, 0.0),
            offset(3.0, 0.0),
            offset(3.0, 0.0),
            offset(1.0, 0.0),
        ];
        assert_eq!(find_nearest(0, &trees, 3).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn test_insufficient_neighbors() {
        let trees = vec![offset(0.0, 0.0), offset(0.0, 0.0), offset(1.0, 0.0)];
        assert_eq!(
            find_nearest(0, &trees, 2),
            Err(OrchardError::InsufficientNeighbors {
                tree: 0,
                found: 1,
                required: 2
            })
        );
    }
}
