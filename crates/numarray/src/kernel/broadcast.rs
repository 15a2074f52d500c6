/// Broadcast shape of two operands, or `None` when they are incompatible.
///
/// Shapes are aligned from the right; a dimension is compatible when both
/// extents are equal or one of them is 1. Missing leading dimensions count
/// as 1.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Option<Vec<usize>> {
    let ndim = lhs.len().max(rhs.len());
    let mut shape = Vec::with_capacity(ndim);

    for i in 0..ndim {
        let l = if i < lhs.len() { lhs[lhs.len() - 1 - i] } else { 1 };
        let r = if i < rhs.len() { rhs[rhs.len() - 1 - i] } else { 1 };

        if l == r || r == 1 {
            shape.push(l);
        } else if l == 1 {
            shape.push(r);
        } else {
            return None;
        }
    }

    shape.reverse();
    Some(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_shapes() {
        assert_eq!(broadcast_shape(&[2, 3], &[2, 3]), Some(vec![2, 3]));
    }

    #[test]
    fn row_against_matrix() {
        assert_eq!(broadcast_shape(&[4, 3], &[3]), Some(vec![4, 3]));
        assert_eq!(broadcast_shape(&[1, 3], &[4, 1]), Some(vec![4, 3]));
    }

    #[test]
    fn scalar_shape_broadcasts_everywhere() {
        assert_eq!(broadcast_shape(&[], &[5, 2]), Some(vec![5, 2]));
    }

    #[test]
    fn zero_extent_wins_over_one() {
        assert_eq!(broadcast_shape(&[0, 3], &[1, 3]), Some(vec![0, 3]));
    }

    #[test]
    fn incompatible() {
        assert_eq!(broadcast_shape(&[2, 2], &[1, 3]), None);
        assert_eq!(broadcast_shape(&[3], &[4]), None);
    }
}
