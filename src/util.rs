//! Small helpers shared across modules

/// Returned by [`find_max`] for an empty sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Array is empty")]
pub struct EmptySequence;

/// Greatest element of a sequence.
///
/// The first of several equal maxima wins. Incomparable values (NaN) never
/// replace the current maximum.
pub fn find_max<T: PartialOrd + Copy>(values: &[T]) -> Result<T, EmptySequence> {
    let (first, rest) = values.split_first().ok_or(EmptySequence)?;
    let mut max = *first;
    for &value in rest {
        if value > max {
            max = value;
        }
    }
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_max() {
        assert_eq!(find_max(&[1, 2, 3, 4, 5]), Ok(5));
        assert_eq!(find_max(&[5, 4, 3]), Ok(5));
        assert_eq!(find_max(&[-7, -2, -9]), Ok(-2));
        assert_eq!(find_max(&[42]), Ok(42));
    }

    #[test]
    fn test_find_max_floats() {
        assert_eq!(find_max(&[0.5, 2.25, 1.0]), Ok(2.25));
    }

    #[test]
    fn test_find_max_empty() {
        let empty: [u32; 0] = [];
        assert_eq!(find_max(&empty), Err(EmptySequence));
        assert_eq!(EmptySequence.to_string(), "Array is empty");
    }
}
