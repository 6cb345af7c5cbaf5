//! Chronological train/test split.

/// Split `rows` into a leading train part and a trailing test part.
///
/// The test part holds `ceil(test_fraction * n)` rows. No shuffling: when
/// rows are in date order every test row is at least as late as every train
/// row.
pub fn chronological_split<T>(rows: &[T], test_fraction: f64) -> (&[T], &[T]) {
    let n = rows.len();
    let n_test = ((test_fraction * n as f64).ceil() as usize).min(n);
    rows.split_at(n - n_test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighty_twenty() {
        let rows: Vec<u32> = (0..10).collect();
        let (train, test) = chronological_split(&rows, 0.2);
        assert_eq!(train, &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(test, &[8, 9]);
    }

    #[test]
    fn test_size_rounds_up() {
        let rows: Vec<u32> = (0..11).collect();
        let (train, test) = chronological_split(&rows, 0.2);
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 3);
    }

    #[test]
    fn single_row_goes_to_test() {
        let (train, test) = chronological_split(&[1], 0.2);
        assert!(train.is_empty());
        assert_eq!(test, &[1]);
    }

    #[test]
    fn empty_input() {
        let rows: [u8; 0] = [];
        let (train, test) = chronological_split(&rows, 0.2);
        assert!(train.is_empty() && test.is_empty());
    }
}
