//! Uniform sampling of ordered item selections.
//!
//! [`Permutations`] streams the `r`-permutations of a pool in lexicographic
//! index order; [`reservoir_sample`] keeps a uniform subset of any stream
//! while holding at most `cap` items.

use rand::Rng;
use std::fmt;

use crate::error::ConfigError;

/// One ordered selection of item names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermutationConfig(pub Vec<String>);

impl PermutationConfig {
    pub fn items(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PermutationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Lazy `r`-permutations of `pool`, in the order `(0,1,..)`, `(0,2,..)`, ...
pub struct Permutations<'a, T> {
    pool: &'a [T],
    r: usize,
    indices: Vec<usize>,
    cycles: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a, T: Clone> Permutations<'a, T> {
    pub fn new(pool: &'a [T], r: usize) -> Self {
        let n = pool.len();
        Self {
            pool,
            r,
            indices: (0..n).collect(),
            cycles: (0..r.min(n)).map(|i| n - i).collect(),
            started: false,
            done: r > n,
        }
    }

    fn current(&self) -> Vec<T> {
        self.indices[..self.r]
            .iter()
            .map(|&i| self.pool[i].clone())
            .collect()
    }
}

impl<T: Clone> Iterator for Permutations<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        let n = self.pool.len();
        for i in (0..self.r).rev() {
            self.cycles[i] -= 1;
            if self.cycles[i] == 0 {
                self.indices[i..].rotate_left(1);
                self.cycles[i] = n - i;
            } else {
                let j = self.cycles[i];
                self.indices.swap(i, n - j);
                return Some(self.current());
            }
        }
        self.done = true;
        None
    }
}

/// Number of `r`-permutations of `n` items, if it fits in a `u128`.
pub fn permutation_count(n: usize, r: usize) -> Option<u128> {
    if r > n {
        return Some(0);
    }
    ((n - r + 1)..=n).try_fold(1u128, |acc, k| acc.checked_mul(k as u128))
}

/// Algorithm R. `cap` of `None` (or zero) keeps everything.
pub fn reservoir_sample<I, R>(stream: I, cap: Option<usize>, rng: &mut R) -> Vec<I::Item>
where
    I: IntoIterator,
    R: Rng + ?Sized,
{
    let cap = cap.filter(|&c| c > 0);
    let mut reservoir = Vec::new();
    for (k, item) in stream.into_iter().enumerate() {
        let seen = k + 1;
        match cap {
            Some(cap) if reservoir.len() >= cap => {
                let j = rng.gen_range(0..seen);
                if j < cap {
                    reservoir[j] = item;
                }
            }
            _ => reservoir.push(item),
        }
    }
    reservoir
}

/// Sample permutations of `items` taken `length` at a time (default: all).
pub fn sample<R: Rng + ?Sized>(
    items: &[String],
    length: Option<usize>,
    cap: Option<usize>,
    rng: &mut R,
) -> Result<Vec<PermutationConfig>, ConfigError> {
    let length = length.unwrap_or(items.len());
    if length > items.len() {
        return Err(ConfigError::LengthExceedsItems {
            length,
            available: items.len(),
        });
    }
    let stream = Permutations::new(items, length).map(PermutationConfig);
    Ok(reservoir_sample(stream, cap, rng))
}
