use ndarray::{Array1, ArrayView1};

/// Squared Euclidean distance between two points.
///
/// The square root is never taken: the value is only used for ordering
/// comparisons and as the movement signal between iterations.
#[inline]
pub fn squared_distance(p: &ArrayView1<f64>, q: &ArrayView1<f64>) -> f64 {
    debug_assert_eq!(p.len(), q.len());

    p.iter()
        .zip(q.iter())
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}

/// Add `y` to `x` elementwise, in place
#[inline]
pub fn add_in_place(x: &mut Array1<f64>, y: &ArrayView1<f64>) {
    debug_assert_eq!(x.len(), y.len());
    x.zip_mut_with(y, |a, &b| *a += b);
}

/// Divide every coordinate of `r` by the scalar `a`, in place.
///
/// `a` must be non-zero; `update_centroid` never calls this for an empty cluster.
#[inline]
pub fn divide_in_place(r: &mut Array1<f64>, a: f64) {
    debug_assert!(a != 0.0);
    r.mapv_inplace(|v| v / a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_squared_distance() {
        let p = array![1.0, 2.0, 3.0];
        let q = array![4.0, 6.0, 3.0];

        // 9 + 16 + 0, no square root
        assert_relative_eq!(squared_distance(&p.view(), &q.view()), 25.0);
        assert_relative_eq!(squared_distance(&q.view(), &p.view()), 25.0);
        assert_relative_eq!(squared_distance(&p.view(), &p.view()), 0.0);
    }

    #[test]
    fn test_add_in_place() {
        let mut x = array![1.0, -2.0];
        let y = array![0.5, 4.0];

        add_in_place(&mut x, &y.view());
        assert_eq!(x, array![1.5, 2.0]);
        // y is untouched
        assert_eq!(y, array![0.5, 4.0]);
    }

    #[test]
    fn test_divide_in_place() {
        let mut r = array![3.0, 9.0, -6.0];
        divide_in_place(&mut r, 3.0);

        assert_relative_eq!(r[0], 1.0);
        assert_relative_eq!(r[1], 3.0);
        assert_relative_eq!(r[2], -2.0);
    }
}
