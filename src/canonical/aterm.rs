use ahash::AHashSet;
use bitvec::prelude::*;
use log::trace;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt::Display;

use super::term_map::TermMap;
use crate::error::WickError;
use crate::index::Idx;
use crate::scalar::Scalar;
use crate::tensor::{Sigma, Tensor};
use crate::term::Term;
use crate::utils::Odometer;

/// Upper bound on the steps of the connectivity search.
pub const MAX_FLOOD_ITERATIONS: usize = 300_000;

/// A fully contracted term: `scalar * sums * tensors`.
///
/// Deltas that survived resolution are carried as symmetric two-leg tensors
/// named `delta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ATerm {
    pub scalar: Scalar,
    pub sums: Vec<Sigma>,
    pub tensors: Vec<Tensor>,
}

impl ATerm {
    pub fn new(scalar: impl Into<Scalar>, sums: Vec<Sigma>, tensors: Vec<Tensor>) -> Self {
        ATerm {
            scalar: scalar.into(),
            sums,
            tensors,
        }
    }

    pub fn from_term(term: &Term) -> Result<Self, WickError> {
        if !term.operators.is_empty() {
            return Err(WickError::UnresolvedOperators(term.operators.len()));
        }
        let mut tensors = term.tensors.clone();
        tensors.extend(term.deltas.iter().map(|d| d.to_tensor()));
        Ok(ATerm {
            scalar: term.scalar,
            sums: term.sums.clone(),
            tensors,
        })
    }

    /// Distinct indices, tensors first in order of appearance, then sums.
    pub fn ilist(&self) -> Vec<Idx> {
        let mut out: Vec<Idx> = Vec::new();
        let all = self
            .tensors
            .iter()
            .flat_map(|t| t.indices.iter())
            .chain(self.sums.iter().map(Sigma::idx));
        for i in all {
            if !out.contains(i) {
                out.push(i.clone());
            }
        }
        out
    }

    pub fn nidx(&self) -> usize {
        self.ilist().len()
    }

    pub fn is_zero(&self) -> bool {
        self.scalar.is_negligible()
    }

    pub fn scale(&self, s: Scalar) -> ATerm {
        ATerm {
            scalar: self.scalar * s,
            ..self.clone()
        }
    }

    pub fn shifted(&self, shift: usize) -> ATerm {
        ATerm {
            scalar: self.scalar,
            sums: self.sums.iter().map(|s| Sigma(s.0.shifted(shift))).collect(),
            tensors: self.tensors.iter().map(|t| t.shifted(shift)).collect(),
        }
    }

    /// Product with renaming of `other` on index collisions.
    pub fn combine(&self, other: &ATerm) -> ATerm {
        let left = self.ilist();
        let right: AHashSet<Idx> = other.ilist().into_iter().collect();
        let other = match left.iter().map(|i| i.index).max() {
            Some(m) if left.iter().any(|i| right.contains(i)) => other.shifted(m + 1),
            _ => other.clone(),
        };
        let mut sums = self.sums.clone();
        sums.extend(other.sums);
        let mut tensors = self.tensors.clone();
        tensors.extend(other.tensors);
        ATerm {
            scalar: self.scalar * other.scalar,
            sums,
            tensors,
        }
    }

    pub fn term_map(&self) -> TermMap {
        TermMap::new(&self.sums, &self.tensors)
    }

    /// Same contraction pattern up to a renaming of indices.
    pub fn matches(&self, other: &ATerm) -> bool {
        self.term_map() == other.term_map()
    }

    /// Same contraction pattern once the tensors of `other` are permuted by
    /// some element of their symmetry groups. Returns the sign of the first
    /// such element.
    pub fn pmatch(&self, other: &ATerm) -> Option<i8> {
        if self.tensors.len() != other.tensors.len() || self.sums.len() != other.sums.len() {
            return None;
        }
        let target = self.term_map();
        let radices = other.tensors.iter().map(|t| t.sym.tlist.len()).collect();

        for choice in Odometer::new(radices) {
            let mut sign = 1i8;
            let permuted: Vec<Tensor> = other
                .tensors
                .iter()
                .zip(&choice)
                .map(|(t, &c)| {
                    let (perm, s) = &t.sym.tlist[c];
                    sign *= s;
                    t.permuted(perm)
                })
                .collect();
            if TermMap::new(&other.sums, &permuted) == target {
                return Some(sign);
            }
        }
        None
    }

    /// Moves external tensors to the front, keeping relative order.
    pub fn sort_tensors(&mut self) {
        let (mut ext, named): (Vec<_>, Vec<_>) =
            self.tensors.drain(..).partition(Tensor::is_external);
        ext.extend(named);
        self.tensors = ext;
    }

    /// Fuses the leading external tensors into one.
    pub fn merge_external(&mut self) -> Result<(), WickError> {
        let num_ext = self.tensors.iter().take_while(|t| t.is_external()).count();
        if self.tensors[num_ext..].iter().any(Tensor::is_external) {
            return Err(WickError::UnsortedExternal);
        }
        if num_ext > 1 {
            let indices = self
                .tensors
                .drain(..num_ext)
                .flat_map(|t| t.indices)
                .collect();
            self.tensors.insert(0, Tensor::external(indices));
        }
        Ok(())
    }

    /// Permutes the free indices, see [`Tensor::transpose`].
    pub fn transpose(&mut self, perm: &[usize]) -> Result<(), WickError> {
        self.merge_external()?;
        match self.tensors.first_mut() {
            Some(t) if t.is_external() => t.transpose(perm),
            _ => Err(WickError::NoExternalTensor),
        }
    }

    /// Whether the named tensors form a single component, two tensors being
    /// adjacent when they share a summed index.
    pub fn connected(&self) -> Result<bool, WickError> {
        let nodes: Vec<&Tensor> = self
            .tensors
            .iter()
            .filter(|t| !t.is_external() && !t.indices.is_empty())
            .collect();
        if nodes.len() < 2 {
            return Ok(true);
        }

        let mut visited = bitvec![0; nodes.len()];
        visited.set(0, true);
        let mut queue = VecDeque::from([0usize]);
        let mut steps = 0usize;

        while let Some(n) = queue.pop_front() {
            for s in self.sums.iter().filter(|s| nodes[n].indices.contains(&s.0)) {
                for (m, t) in nodes.iter().enumerate() {
                    steps += 1;
                    if steps > MAX_FLOOD_ITERATIONS {
                        return Err(WickError::ConnectivityLimit(MAX_FLOOD_ITERATIONS));
                    }
                    if !visited[m] && t.indices.contains(&s.0) {
                        visited.set(m, true);
                        queue.push_back(m);
                    }
                }
            }
        }
        Ok(visited.all())
    }

    /// Disconnected, or disconnected by dropping any single summation.
    pub fn reducible(&self) -> Result<bool, WickError> {
        if !self.connected()? {
            return Ok(true);
        }
        for i in 0..self.sums.len() {
            let mut cut = self.clone();
            let dropped = cut.sums.remove(i);
            if !cut.connected()? {
                trace!("dropping the sum over {} disconnects the term", dropped.0);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Tensor count, then sum count, then tensors, then sums.
    pub fn structural_cmp(&self, other: &ATerm) -> Ordering {
        self.tensors
            .len()
            .cmp(&other.tensors.len())
            .then_with(|| self.sums.len().cmp(&other.sums.len()))
            .then_with(|| self.tensors.cmp(&other.tensors))
            .then_with(|| self.sums.cmp(&other.sums))
    }
}

impl TryFrom<&Term> for ATerm {
    type Error = WickError;

    fn try_from(value: &Term) -> Result<Self, Self::Error> {
        ATerm::from_term(value)
    }
}

impl PartialEq for ATerm {
    fn eq(&self, other: &Self) -> bool {
        fn as_set<T: Eq + std::hash::Hash>(v: &[T]) -> AHashSet<&T> {
            v.iter().collect()
        }
        self.scalar == other.scalar
            && as_set(&self.sums) == as_set(&other.sums)
            && as_set(&self.tensors) == as_set(&other.tensors)
    }
}

impl Display for ATerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scalar)?;
        for s in &self.sums {
            write!(f, "{s}")?;
        }
        for t in &self.tensors {
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use crate::tensor::{Delta, TensorSym};

    fn o(i: usize) -> Idx {
        Idx::new(i, "occ")
    }

    fn v(i: usize) -> Idx {
        Idx::new(i, "vir")
    }

    fn anti(indices: Vec<Idx>) -> Tensor {
        Tensor::with_sym(indices, "I", TensorSym::antisymmetric_two_body()).unwrap()
    }

    #[test]
    fn from_term() {
        let t = Term::new(
            1,
            vec![],
            vec![Tensor::new(vec![o(0)], "f")],
            vec![],
            vec![Delta::new(v(0), v(1)).unwrap()],
        );
        let a = ATerm::from_term(&t).unwrap();
        assert_eq!(a.tensors.len(), 2);
        assert_eq!(a.tensors[1].name, "delta");
        assert_eq!(a.tensors[1].sym, TensorSym::symmetric_pair());

        let with_ops = Term::new(1, vec![], vec![], vec![Operator::Projector], vec![]);
        assert_eq!(
            ATerm::try_from(&with_ops),
            Err(WickError::UnresolvedOperators(1))
        );
    }

    #[test]
    fn pmatch_antisymmetric() {
        let sums = vec![Sigma(o(0)), Sigma(o(1))];
        let direct = ATerm::new(
            Scalar::fraction(1, 2),
            sums.clone(),
            vec![anti(vec![o(0), o(1), o(0), o(1)])],
        );
        let exchange = ATerm::new(
            Scalar::fraction(-1, 2),
            sums,
            vec![anti(vec![o(0), o(1), o(1), o(0)])],
        );

        assert!(!direct.matches(&exchange));
        assert_eq!(direct.pmatch(&exchange), Some(-1));
        assert_eq!(exchange.pmatch(&direct), Some(-1));
        assert_eq!(direct.pmatch(&direct), Some(1));

        let plain = ATerm::new(
            1,
            vec![Sigma(o(0)), Sigma(o(1))],
            vec![Tensor::new(vec![o(0), o(1), o(1), o(0)], "I")],
        );
        assert_eq!(direct.pmatch(&plain), None);

        let fewer_sums = ATerm::new(1, vec![Sigma(o(0))], direct.tensors.clone());
        assert_eq!(direct.pmatch(&fewer_sums), None);
    }

    #[test]
    fn match_is_symmetric() {
        let a = ATerm::new(
            1,
            vec![Sigma(o(0)), Sigma(v(0))],
            vec![Tensor::new(vec![v(0), o(0)], "f"), Tensor::new(vec![v(0), o(0)], "t")],
        );
        let b = ATerm::new(
            3,
            vec![Sigma(v(2)), Sigma(o(5))],
            vec![Tensor::new(vec![v(2), o(5)], "f"), Tensor::new(vec![v(2), o(5)], "t")],
        );
        assert!(a.matches(&b));
        assert!(b.matches(&a));
        assert_eq!(a.pmatch(&b), Some(1));
        assert_eq!(b.pmatch(&a), Some(1));
    }

    #[test]
    fn connectivity() {
        let single = ATerm::new(1, vec![Sigma(o(0))], vec![Tensor::new(vec![o(0)], "f")]);
        assert!(single.connected().unwrap());
        assert!(ATerm::new(1, vec![], vec![]).connected().unwrap());

        let apart = ATerm::new(
            1,
            vec![Sigma(o(0)), Sigma(o(1))],
            vec![Tensor::new(vec![o(0)], "f"), Tensor::new(vec![o(1)], "g")],
        );
        assert!(!apart.connected().unwrap());
        assert!(apart.reducible().unwrap());

        let linked = ATerm::new(
            1,
            vec![Sigma(o(0)), Sigma(v(0))],
            vec![
                Tensor::external(vec![o(1)]),
                Tensor::new(vec![o(0), v(0)], "f"),
                Tensor::new(vec![v(0), o(0)], "t"),
            ],
        );
        assert!(linked.connected().unwrap());
        assert!(!linked.reducible().unwrap());

        let chain = ATerm::new(
            1,
            vec![Sigma(o(0))],
            vec![Tensor::new(vec![o(0), v(0)], "f"), Tensor::new(vec![v(0), o(0)], "t")],
        );
        assert!(chain.connected().unwrap());
        assert!(chain.reducible().unwrap());
    }

    #[test]
    fn externals() {
        let mut t = ATerm::new(
            1,
            vec![Sigma(o(0))],
            vec![
                Tensor::new(vec![o(0), v(0)], "f"),
                Tensor::external(vec![v(0)]),
                Tensor::external(vec![o(1)]),
            ],
        );
        assert_eq!(t.merge_external(), Err(WickError::UnsortedExternal));

        t.sort_tensors();
        assert!(t.tensors[0].is_external() && t.tensors[1].is_external());
        assert_eq!(t.tensors[0].indices, vec![v(0)]);

        t.transpose(&[1, 0]).unwrap();
        assert_eq!(t.tensors.len(), 2);
        assert_eq!(t.tensors[0].indices, vec![o(1), v(0)]);

        let mut none = ATerm::new(1, vec![], vec![Tensor::new(vec![o(0)], "f")]);
        assert_eq!(none.transpose(&[0]), Err(WickError::NoExternalTensor));
    }

    #[test]
    fn ordering_and_product() {
        let f = ATerm::new(1, vec![Sigma(o(0))], vec![Tensor::new(vec![o(0)], "f")]);
        let g = ATerm::new(2, vec![], vec![Tensor::new(vec![o(0), o(1)], "g")]);
        assert_eq!(f.structural_cmp(&g), Ordering::Greater);

        let fg = f.combine(&g);
        assert_eq!(fg.scalar, Scalar::from(2));
        assert_eq!(fg.tensors[1], Tensor::new(vec![o(1), o(2)], "g"));
        assert_eq!(fg.structural_cmp(&f), Ordering::Greater);
        assert_eq!(fg.nidx(), 3);
    }
}
