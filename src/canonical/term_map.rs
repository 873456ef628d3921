use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::index::Idx;
use crate::tensor::{Sigma, Tensor};

/// One tie between a leg of a tensor and a leg (possibly itself) that carries
/// the same index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Leg {
    pub position: usize,
    pub partner: String,
    pub partner_position: usize,
    pub summed: bool,
}

/// Legs of one tensor grouped by index space.
pub type LegMap = BTreeMap<String, BTreeSet<Leg>>;

/// Contraction pattern of a product of tensors.
///
/// For every tensor, every leg is tied to all legs carrying the same index,
/// recording the partner's name and position and whether the index is summed.
/// Index labels never enter the map, so two terms related by a renaming of
/// their indices have equal maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMap {
    data: BTreeSet<(String, LegMap)>,
}

impl TermMap {
    pub fn new(sums: &[Sigma], tensors: &[Tensor]) -> Self {
        let summed: AHashSet<&Idx> = sums.iter().map(Sigma::idx).collect();
        let mut data = BTreeSet::new();

        for ti in tensors {
            let mut legs = LegMap::new();
            for (position, idx) in ti.indices.iter().enumerate() {
                let is_summed = summed.contains(idx);
                let entry = legs.entry(idx.space.clone()).or_default();
                for tj in tensors {
                    for (partner_position, _) in
                        tj.indices.iter().enumerate().filter(|(_, j)| *j == idx)
                    {
                        entry.insert(Leg {
                            position,
                            partner: tj.name.clone(),
                            partner_position,
                            summed: is_summed,
                        });
                    }
                }
            }
            data.insert((ti.name.clone(), legs));
        }
        TermMap { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn o(i: usize) -> Idx {
        Idx::new(i, "occ")
    }

    fn v(i: usize) -> Idx {
        Idx::new(i, "vir")
    }

    #[test]
    fn renaming_invariance() {
        let sums1 = vec![Sigma(o(0)), Sigma(v(0))];
        let tensors1 = vec![
            Tensor::new(vec![v(0), o(0)], "f"),
            Tensor::new(vec![v(0), o(0)], "t"),
        ];
        let sums2 = vec![Sigma(o(3)), Sigma(v(7))];
        let tensors2 = vec![
            Tensor::new(vec![v(7), o(3)], "f"),
            Tensor::new(vec![v(7), o(3)], "t"),
        ];
        assert_eq!(
            TermMap::new(&sums1, &tensors1),
            TermMap::new(&sums2, &tensors2)
        );
    }

    #[test]
    fn summation_matters() {
        let tensors = vec![
            Tensor::new(vec![v(0), o(0)], "f"),
            Tensor::new(vec![v(0), o(0)], "t"),
        ];
        assert_ne!(
            TermMap::new(&[Sigma(o(0)), Sigma(v(0))], &tensors),
            TermMap::new(&[Sigma(o(0))], &tensors)
        );
    }

    #[test]
    fn pattern_matters() {
        let sums = vec![Sigma(o(0)), Sigma(o(1))];
        let direct = vec![Tensor::new(vec![o(0), o(1), o(0), o(1)], "v")];
        let exchange = vec![Tensor::new(vec![o(0), o(1), o(1), o(0)], "v")];
        assert_ne!(TermMap::new(&sums, &direct), TermMap::new(&sums, &exchange));
        assert_eq!(TermMap::new(&sums, &direct).len(), 1);
    }
}
