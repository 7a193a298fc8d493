//! Fixed-size batching.

/// Split `items` into consecutive chunks of at most `max_size` elements.
///
/// Chunks keep input order and only the last one may be shorter. Nothing is
/// dropped or duplicated. A `max_size` of 0 is treated as 1.
///
/// ```ignore
/// assert_eq!(split(&[1, 2, 3, 4], 3), vec![vec![1, 2, 3], vec![4]]);
/// ```
pub fn split<T: Clone>(items: &[T], max_size: usize) -> Vec<Vec<T>> {
    let batches: Vec<Vec<T>> = items
        .chunks(max_size.max(1))
        .map(<[T]>::to_vec)
        .collect();

    tracing::trace!(
        "Split {} items into {} batches (max size {})",
        items.len(),
        batches.len(),
        max_size
    );

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_even() {
        let items: Vec<u32> = (1..=9).collect();
        assert_eq!(
            split(&items, 3),
            vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]
        );
    }

    #[test]
    fn test_split_with_remainder() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(
            split(&items, 3),
            vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9], vec![10]]
        );
    }

    #[test]
    fn test_split_empty() {
        let items: Vec<u32> = vec![];
        for size in 1..5 {
            assert!(split(&items, size).is_empty());
        }
    }

    #[test]
    fn test_split_single_chunk_when_size_covers_input() {
        let items = vec![1, 2, 3];
        assert_eq!(split(&items, 3), vec![vec![1, 2, 3]]);
        assert_eq!(split(&items, 50), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_split_zero_size_is_one() {
        let items = vec!["a", "b"];
        assert_eq!(split(&items, 0), vec![vec!["a"], vec!["b"]]);
    }
}
