use serde::{Deserialize, Serialize};

use crate::error::WickError;

/// A permutation of tensor legs, stored together with its inverse.
///
/// `apply_slice` reads position `k` of the result from `slice[map[k]]`, so a
/// tensor `T[p, q, r, s]` permuted by `[1, 0, 2, 3]` becomes `T[q, p, r, s]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permutation {
    map: Vec<usize>,
    inv: Vec<usize>,
}

impl PartialOrd for Permutation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.map.partial_cmp(&other.map)
    }
}

impl Permutation {
    pub fn apply_slice<T: Clone, S>(&self, slice: S) -> Vec<T>
    where
        S: AsRef<[T]>,
    {
        let s = slice.as_ref();
        self.map.iter().map(|&idx| s[idx].clone()).collect()
    }

    pub fn apply_slice_inv<T: Clone, S>(&self, slice: S) -> Vec<T>
    where
        S: AsRef<[T]>,
    {
        let s = slice.as_ref();
        self.inv.iter().map(|&idx| s[idx].clone()).collect()
    }

    pub fn inverse(&self) -> Self {
        Permutation {
            map: self.inv.clone(),
            inv: self.map.clone(),
        }
    }

    pub fn id(n: usize) -> Self {
        Permutation {
            map: (0..n).collect(),
            inv: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.map.iter().enumerate().all(|(i, &j)| i == j)
    }

    pub fn map(&self) -> &[usize] {
        &self.map
    }

    /// Builds a permutation from its image list, rejecting anything that is
    /// not a bijection of `0..map.len()`.
    pub fn from_map(map: Vec<usize>) -> Result<Self, WickError> {
        let mut inv = vec![usize::MAX; map.len()];
        for (i, &j) in map.iter().enumerate() {
            if j >= map.len() || inv[j] != usize::MAX {
                return Err(WickError::InvalidPermutation(map));
            }
            inv[j] = i;
        }
        Ok(Permutation { map, inv })
    }

    pub fn sort<T, S>(slice: S) -> Permutation
    where
        T: Ord,
        S: AsRef<[T]>,
    {
        let s = slice.as_ref();
        let mut map: Vec<usize> = (0..s.len()).collect();
        map.sort_by_key(|&i| &s[i]);
        Permutation::from_valid_map(map)
    }

    /// Caller guarantees `map` is a bijection of `0..map.len()`.
    pub(crate) fn from_valid_map(map: Vec<usize>) -> Self {
        let mut inv = vec![0; map.len()];
        for (i, &j) in map.iter().enumerate() {
            inv[j] = i;
        }
        Permutation { map, inv }
    }

    pub fn find_cycles(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.map.len()];
        let mut cycles = Vec::new();
        for i in 0..self.map.len() {
            if visited[i] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut j = i;
            while !visited[j] {
                visited[j] = true;
                cycle.push(j);
                j = self.map[j];
            }
            if !cycle.is_empty() {
                cycles.push(cycle);
            }
        }
        cycles
    }

    fn cycle_to_transpositions(cycle: &[usize]) -> Vec<(usize, usize)> {
        let mut transpositions = Vec::new();
        for i in (1..cycle.len()).rev() {
            transpositions.push((cycle[0], cycle[i]));
        }
        transpositions
    }

    pub fn transpositions(&self) -> Vec<(usize, usize)> {
        let cycles = self.find_cycles();
        let mut transpositions = Vec::new();
        for cycle in cycles {
            transpositions.extend(Self::cycle_to_transpositions(&cycle));
        }
        transpositions
    }

    /// +1 for even permutations, -1 for odd ones.
    pub fn parity(&self) -> i8 {
        if self.transpositions().len() % 2 == 0 {
            1
        } else {
            -1
        }
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = WickError;

    fn try_from(value: Vec<usize>) -> Result<Self, Self::Error> {
        Permutation::from_map(value)
    }
}
