//! Combinatorial tables for derivative-coefficient indexing
//!
//! The dual-number type stores all partial derivatives up to the configured
//! order in one flat array. Triangular and tetrahedral numbers lay out the
//! multi-index → linear-index mapping; the binomial table serves the
//! partition bookkeeping. All three are emitted into the generated constants
//! header so the GLSL side indexes the same way.
//!
//! Author: Moroya Sakamoto

/// Cumulative triangular numbers 0, 1, 3, 6, 10, ... of length `n + 1`.
pub fn triangular_numbers(n: usize) -> Vec<usize> {
    let mut v = vec![0; n + 1];
    if n >= 1 {
        v[1] = 1;
    }
    let mut step = 2;
    for i in 2..=n {
        v[i] = v[i - 1] + step;
        step += 1;
    }
    v
}

/// Cumulative tetrahedral numbers 0, 1, 4, 10, 20, ... of length `n + 1`.
pub fn tetrahedral_numbers(n: usize) -> Vec<usize> {
    let mut v = vec![0; n + 1];
    if n >= 1 {
        v[1] = 1;
    }
    let mut step = 3;
    let mut substep = 3;
    for i in 2..=n {
        v[i] = v[i - 1] + step;
        step += substep;
        substep += 1;
    }
    v
}

/// `n`×`n` Pascal's triangle: `t[i][j] = C(i, j)`, zero above the diagonal.
pub fn binomial_table(n: usize) -> Vec<Vec<usize>> {
    let mut t = vec![vec![0; n]; n];
    for row in t.iter_mut() {
        row[0] = 1;
    }
    for i in 1..n {
        for j in 1..n {
            t[i][j] = t[i - 1][j - 1] + t[i - 1][j];
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangular_sequence() {
        assert_eq!(triangular_numbers(5), vec![0, 1, 3, 6, 10, 15]);
        assert_eq!(triangular_numbers(0), vec![0]);
        assert_eq!(triangular_numbers(1), vec![0, 1]);
    }

    #[test]
    fn tetrahedral_sequence() {
        assert_eq!(tetrahedral_numbers(5), vec![0, 1, 4, 10, 20, 35]);
        assert_eq!(tetrahedral_numbers(1), vec![0, 1]);
    }

    #[test]
    fn binomial_values() {
        let t = binomial_table(6);
        assert_eq!(t[0][0], 1);
        assert_eq!(t[4][2], 6);
        assert_eq!(t[5][1], 5);
        assert_eq!(t[5][5], 1);
        // zero above the diagonal
        assert_eq!(t[2][4], 0);
    }
}
