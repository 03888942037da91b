//! Envelope ("skyline") Cholesky factorization for sparse symmetric
//! positive-definite systems.
//!
//! Each row stores the lower triangle from its first structurally nonzero
//! column up to the diagonal. Factorization fills in only inside that
//! envelope, so a cyclic band costs O(n) except for the wrap-around rows.

#[derive(Clone, Debug)]
pub(super) struct SkylineMatrix {
    first: Vec<usize>,
    rows: Vec<Vec<f64>>,
}

impl SkylineMatrix {
    /// Allocates a zero matrix whose envelope covers `coords` (any order;
    /// upper-triangle coordinates are mirrored).
    pub fn with_profile(n: usize, coords: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut first: Vec<usize> = (0..n).collect();
        for (i, j) in coords {
            let (row, col) = if j > i { (j, i) } else { (i, j) };
            first[row] = first[row].min(col);
        }
        let rows = first
            .iter()
            .enumerate()
            .map(|(i, &f)| vec![0.0; i - f + 1])
            .collect();
        Self { first, rows }
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// Adds `value` at `(i, j)` and, implicitly, at `(j, i)`.
    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        let (row, col) = if j > i { (j, i) } else { (i, j) };
        debug_assert!(col >= self.first[row], "entry outside envelope");
        self.rows[row][col - self.first[row]] += value;
    }

    #[cfg(test)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (row, col) = if j > i { (j, i) } else { (i, j) };
        if col < self.first[row] {
            0.0
        } else {
            self.rows[row][col - self.first[row]]
        }
    }

    /// Computes `L` with `A = L Lᵀ`. Returns `None` if a pivot is not
    /// safely positive.
    pub fn factor(mut self) -> Option<CholeskyFactor> {
        let n = self.len();
        for i in 0..n {
            let fi = self.first[i];
            let (done, rest) = self.rows.split_at_mut(i);
            let row_i = &mut rest[0];

            for j in fi..i {
                let fj = self.first[j];
                let row_j = &done[j];
                let mut s = row_i[j - fi];
                for k in fi.max(fj)..j {
                    s -= row_i[k - fi] * row_j[k - fj];
                }
                s /= row_j[j - fj];
                row_i[j - fi] = s;
            }

            let diag = row_i[i - fi];
            let mut s = diag;
            for k in fi..i {
                s -= row_i[k - fi] * row_i[k - fi];
            }
            if !s.is_finite() || s <= diag.abs() * f64::EPSILON {
                return None;
            }
            row_i[i - fi] = s.sqrt();
        }

        Some(CholeskyFactor {
            first: self.first,
            rows: self.rows,
        })
    }
}

#[derive(Clone, Debug)]
pub(super) struct CholeskyFactor {
    first: Vec<usize>,
    rows: Vec<Vec<f64>>,
}

impl CholeskyFactor {
    /// Solves `A x = b`.
    pub fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.first.len();
        debug_assert_eq!(b.len(), n);

        // L z = b
        let mut x = b.to_vec();
        for i in 0..n {
            let fi = self.first[i];
            let row = &self.rows[i];
            let mut s = x[i];
            for k in fi..i {
                s -= row[k - fi] * x[k];
            }
            x[i] = s / row[i - fi];
        }

        // Lᵀ x = z, column-oriented
        for i in (0..n).rev() {
            let fi = self.first[i];
            let row = &self.rows[i];
            x[i] /= row[i - fi];
            let xi = x[i];
            for k in fi..i {
                x[k] -= row[k - fi] * xi;
            }
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Cyclic tridiagonal SPD matrix: 4 on the diagonal, 1 on neighbours.
    fn cyclic(n: usize) -> SkylineMatrix {
        let coords = (0..n).flat_map(|i| [(i, i), (i, (i + 1) % n)]);
        let mut m = SkylineMatrix::with_profile(n, coords);
        for i in 0..n {
            m.add(i, i, 4.0);
            m.add(i, (i + 1) % n, 1.0);
        }
        m
    }

    fn multiply(m: &SkylineMatrix, x: &[f64]) -> Vec<f64> {
        let n = m.len();
        (0..n)
            .map(|i| (0..n).map(|j| m.get(i, j) * x[j]).sum())
            .collect()
    }

    #[test]
    fn test_profile_covers_wraparound() {
        let m = cyclic(6);
        assert_eq!(m.first[0], 0);
        assert_eq!(m.first[1], 0);
        assert_eq!(m.first[3], 2);
        // (5, 0) closes the cycle
        assert_eq!(m.first[5], 0);
        assert_relative_eq!(m.get(0, 5), 1.0);
        assert_relative_eq!(m.get(5, 0), 1.0);
        assert_relative_eq!(m.get(0, 3), 0.0);
    }

    #[test]
    fn test_solve_recovers_known_solution() {
        let m = cyclic(7);
        let expected: Vec<f64> = (0..7).map(|i| (i as f64) * 0.5 - 1.0).collect();
        let b = multiply(&m, &expected);

        let x = m.factor().unwrap().solve(&b);
        for (got, want) in x.iter().zip(&expected) {
            assert_relative_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dense_envelope() {
        let mut m = SkylineMatrix::with_profile(3, [(1, 0), (2, 0), (2, 1)]);
        // [[4, 2, 2], [2, 5, 3], [2, 3, 6]]
        for (i, j, v) in [(0, 0, 4.0), (1, 1, 5.0), (2, 2, 6.0), (1, 0, 2.0), (2, 0, 2.0), (2, 1, 3.0)] {
            m.add(i, j, v);
        }
        let b = multiply(&m, &[1.0, -2.0, 3.0]);
        let x = m.factor().unwrap().solve(&b);
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], -2.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_indefinite_matrix_fails() {
        let mut m = SkylineMatrix::with_profile(2, [(1, 0)]);
        m.add(0, 0, 1.0);
        m.add(1, 1, 1.0);
        m.add(1, 0, 2.0);
        assert!(m.factor().is_none());
    }

    #[test]
    fn test_zero_matrix_fails() {
        let m = SkylineMatrix::with_profile(3, std::iter::empty());
        assert!(m.factor().is_none());
    }
}
