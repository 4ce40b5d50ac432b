//! Lexicographic k-combination generator.
//!
//! Iterative (no recursion) and lazy. A generator can be restricted to a
//! single first index, which partitions the combination space into
//! independent slices that can be evaluated on separate workers and
//! merged afterwards.

/// Iterator over k-combinations of `0..n` in lexicographic order.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    /// Only yield combinations starting with this index.
    fixed_first: Option<usize>,
    done: bool,
}

impl Combinations {
    /// All C(n, k) combinations. Yields nothing when `k == 0` or `k > n`.
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k).collect(),
            fixed_first: None,
            done: k == 0 || k > n,
        }
    }

    /// The C(n - first - 1, k - 1) combinations whose first index is `first`.
    pub fn starting_at(n: usize, k: usize, first: usize) -> Self {
        let done = k == 0 || first + k > n;
        Self {
            n,
            k,
            indices: (first..first + k).collect(),
            fixed_first: Some(first),
            done,
        }
    }

    /// Current position; `None` once exhausted.
    ///
    /// Feeding this to [`Combinations::resume`] restarts the sequence at
    /// the same combination.
    pub fn position(&self) -> Option<&[usize]> {
        (!self.done).then_some(self.indices.as_slice())
    }

    /// Resumes a full sequence at `indices` (inclusive).
    ///
    /// Returns `None` if `indices` is not a valid strictly increasing
    /// k-combination of `0..n`.
    pub fn resume(n: usize, indices: &[usize]) -> Option<Self> {
        let k = indices.len();
        let increasing = indices.windows(2).all(|w| w[0] < w[1]);
        let in_range = indices.last().is_some_and(|&last| last < n);
        if !increasing || !in_range {
            return None;
        }
        Some(Self {
            n,
            k,
            indices: indices.to_vec(),
            fixed_first: None,
            done: false,
        })
    }

    fn advance(&mut self) {
        // Rightmost index that can still move
        let movable = (0..self.k)
            .rev()
            .find(|&i| self.indices[i] < self.n - self.k + i);

        match movable {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..self.k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                if self
                    .fixed_first
                    .is_some_and(|first| self.indices[0] != first)
                {
                    self.done = true;
                }
            }
            None => self.done = true,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        self.advance();
        Some(current)
    }
}

/// Binomial coefficient C(n, k), saturating at `u64::MAX`.
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        // Exact at every step: result * (n - i) is divisible by (i + 1)
        result = match result.checked_mul((n - i) as u64) {
            Some(v) => v / (i as u64 + 1),
            None => return u64::MAX,
        };
    }
    result
}
