use ahash::AHashSet;
use indexmap::IndexSet;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

use crate::index::Idx;
use crate::operator::Operator;
use crate::scalar::Scalar;
use crate::tensor::{Delta, Sigma, Tensor};

/// One unreduced contribution: `scalar * sums * tensors * operators * deltas`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    pub scalar: Scalar,
    pub sums: Vec<Sigma>,
    pub tensors: Vec<Tensor>,
    pub operators: Vec<Operator>,
    pub deltas: Vec<Delta>,
}

impl Term {
    pub fn new(
        scalar: impl Into<Scalar>,
        sums: Vec<Sigma>,
        tensors: Vec<Tensor>,
        operators: Vec<Operator>,
        deltas: Vec<Delta>,
    ) -> Self {
        Term {
            scalar: scalar.into(),
            sums,
            tensors,
            operators,
            deltas,
        }
    }

    /// Every distinct index in the term, sorted.
    pub fn ilist(&self) -> Vec<Idx> {
        let mut set = BTreeSet::new();
        set.extend(self.operators.iter().filter_map(Operator::idx).cloned());
        for t in &self.tensors {
            set.extend(t.indices.iter().cloned());
        }
        set.extend(self.sums.iter().map(|s| s.0.clone()));
        for d in &self.deltas {
            set.insert(d.i1.clone());
            set.insert(d.i2.clone());
        }
        set.into_iter().collect()
    }

    pub fn scale(&self, s: Scalar) -> Term {
        Term {
            scalar: self.scalar * s,
            ..self.clone()
        }
    }

    pub fn shifted(&self, shift: usize) -> Term {
        Term {
            scalar: self.scalar,
            sums: self.sums.iter().map(|s| Sigma(s.0.shifted(shift))).collect(),
            tensors: self.tensors.iter().map(|t| t.shifted(shift)).collect(),
            operators: self.operators.iter().map(|o| o.shifted(shift)).collect(),
            deltas: self.deltas.iter().map(|d| d.shifted(shift)).collect(),
        }
    }

    /// The product `self * other`.
    ///
    /// If the two terms share any index, every label of `other` is first
    /// moved past the largest label of `self`.
    pub fn combine(&self, other: &Term) -> Term {
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
        let mut operators = self.operators.clone();
        operators.extend(other.operators);
        let mut deltas = self.deltas.clone();
        deltas.extend(other.deltas);

        Term {
            scalar: self.scalar * other.scalar,
            sums,
            tensors,
            operators,
            deltas,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.scalar.is_negligible()
    }

    fn is_summed(&self, idx: &Idx) -> bool {
        self.sums.iter().any(|s| &s.0 == idx)
    }

    fn remove_sum(&mut self, idx: &Idx) {
        if let Some(p) = self.sums.iter().position(|s| &s.0 == idx) {
            self.sums.remove(p);
        }
    }

    fn substitute(&mut self, from: &Idx, to: &Idx, pending: &mut [Delta]) {
        for t in &mut self.tensors {
            t.substitute(from, to);
        }
        for o in &mut self.operators {
            *o = o.substitute(from, to);
        }
        for d in pending {
            d.substitute(from, to);
        }
    }

    /// Eliminates every delta that touches a summed index.
    ///
    /// A delta with exactly one summed side replaces the summed index by the
    /// other one everywhere and drops its sum. Only once none of those are
    /// left is a delta between two summed indices collapsed, keeping the
    /// first. Self-deltas vanish and keep their sum. Deltas between two
    /// distinct free indices survive. Every substitution reclassifies the
    /// remaining deltas, so chains collapse fully.
    pub fn resolve(&self) -> Term {
        let mut out = Term {
            deltas: vec![],
            ..self.clone()
        };
        let mut pending: Vec<Delta> = self
            .deltas
            .iter()
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        loop {
            pending.retain(|d| !d.is_trivial());

            let one_sided = pending
                .iter()
                .position(|d| out.is_summed(&d.i1) != out.is_summed(&d.i2));
            let (pos, from, to) = if let Some(pos) = one_sided {
                let d = &pending[pos];
                if out.is_summed(&d.i1) {
                    (pos, d.i1.clone(), d.i2.clone())
                } else {
                    (pos, d.i2.clone(), d.i1.clone())
                }
            } else if let Some(pos) = pending
                .iter()
                .position(|d| out.is_summed(&d.i1) && out.is_summed(&d.i2))
            {
                let d = &pending[pos];
                (pos, d.i2.clone(), d.i1.clone())
            } else {
                break;
            };

            trace!("resolving delta {} by {} -> {}", pending[pos], from, to);
            pending.remove(pos);
            out.remove_sum(&from);
            out.substitute(&from, &to, &mut pending);
        }

        out.deltas = pending
            .into_iter()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        out
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        fn as_set<T: Eq + std::hash::Hash>(v: &[T]) -> AHashSet<&T> {
            v.iter().collect()
        }
        self.scalar == other.scalar
            && as_set(&self.sums) == as_set(&other.sums)
            && as_set(&self.tensors) == as_set(&other.tensors)
            && self.operators == other.operators
            && as_set(&self.deltas) == as_set(&other.deltas)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scalar)?;
        for s in &self.sums {
            write!(f, "{s}")?;
        }
        for d in &self.deltas {
            write!(f, "{d}")?;
        }
        for t in &self.tensors {
            write!(f, "{t}")?;
        }
        for o in &self.operators {
            write!(f, "{o}")?;
        }
        Ok(())
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

    fn delta(i: Idx, j: Idx) -> Delta {
        Delta::new(i, j).unwrap()
    }

    #[test]
    fn multiplication_renames_on_collision() {
        let t1 = Term::new(
            2,
            vec![Sigma(o(0))],
            vec![Tensor::new(vec![o(0), v(0)], "f")],
            vec![],
            vec![],
        );
        let t2 = Term::new(
            Scalar::fraction(1, 2),
            vec![Sigma(o(0))],
            vec![Tensor::new(vec![o(0)], "g")],
            vec![Operator::fermion(o(0), true)],
            vec![],
        );
        let p = t1.combine(&t2);
        assert_eq!(p.scalar, Scalar::one());
        assert_eq!(p.sums, vec![Sigma(o(0)), Sigma(o(1))]);
        assert_eq!(p.tensors[1], Tensor::new(vec![o(1)], "g"));
        assert_eq!(p.operators, vec![Operator::fermion(o(1), true)]);

        let t3 = Term::new(1, vec![], vec![Tensor::new(vec![v(3)], "h")], vec![], vec![]);
        let q = t1.combine(&t3);
        assert_eq!(q.tensors[1], Tensor::new(vec![v(3)], "h"));
    }

    #[test]
    fn resolve_one_summed() {
        let t = Term::new(
            1,
            vec![Sigma(o(0))],
            vec![Tensor::new(vec![o(0), v(0)], "f")],
            vec![],
            vec![delta(o(0), o(1))],
        );
        let r = t.resolve();
        assert!(r.sums.is_empty());
        assert!(r.deltas.is_empty());
        assert_eq!(r.tensors, vec![Tensor::new(vec![o(1), v(0)], "f")]);

        let t = Term::new(
            1,
            vec![Sigma(o(0))],
            vec![Tensor::new(vec![o(0), v(0)], "f")],
            vec![],
            vec![delta(o(1), o(0))],
        );
        assert_eq!(t.resolve(), r);
    }

    #[test]
    fn resolve_chain() {
        let t = Term::new(
            1,
            vec![Sigma(o(0)), Sigma(o(1))],
            vec![
                Tensor::new(vec![o(0)], "f"),
                Tensor::new(vec![o(1)], "g"),
            ],
            vec![],
            vec![delta(o(2), o(0)), delta(o(0), o(1))],
        );
        let r = t.resolve();
        assert!(r.sums.is_empty());
        assert!(r.deltas.is_empty());
        assert_eq!(
            r.tensors,
            vec![Tensor::new(vec![o(2)], "f"), Tensor::new(vec![o(2)], "g")]
        );
    }

    #[test]
    fn resolve_both_summed() {
        let t = Term::new(
            1,
            vec![Sigma(o(0)), Sigma(o(1))],
            vec![
                Tensor::new(vec![o(0)], "f"),
                Tensor::new(vec![o(1)], "g"),
            ],
            vec![],
            vec![delta(o(0), o(1))],
        );
        let r = t.resolve();
        assert_eq!(r.sums, vec![Sigma(o(0))]);
        assert_eq!(
            r.tensors,
            vec![Tensor::new(vec![o(0)], "f"), Tensor::new(vec![o(0)], "g")]
        );
    }

    #[test]
    fn resolve_free_and_trivial() {
        let t = Term::new(
            1,
            vec![Sigma(v(0))],
            vec![Tensor::new(vec![v(0)], "f")],
            vec![],
            vec![
                delta(o(0), o(1)),
                delta(o(1), o(0)),
                delta(v(0), v(0)),
            ],
        );
        let r = t.resolve();
        assert_eq!(r.deltas, vec![delta(o(0), o(1))]);
        assert_eq!(r.sums, vec![Sigma(v(0))]);
        assert_eq!(r.resolve(), r);
    }

    #[test]
    fn resolve_idempotent() {
        let t = Term::new(
            -1,
            vec![Sigma(o(0)), Sigma(o(1)), Sigma(v(0))],
            vec![Tensor::new(vec![o(0), o(1), v(0), v(1)], "v")],
            vec![],
            vec![delta(o(0), o(2)), delta(o(1), o(0)), delta(v(1), v(2))],
        );
        let r = t.resolve();
        assert_eq!(r.resolve(), r);
        assert_eq!(r.sums, vec![Sigma(v(0))]);
        assert_eq!(r.deltas, vec![delta(v(1), v(2))]);
    }

    #[test]
    fn set_equality() {
        let t1 = Term::new(
            1,
            vec![Sigma(o(0)), Sigma(v(0))],
            vec![],
            vec![],
            vec![delta(o(1), o(2))],
        );
        let t2 = Term::new(
            1,
            vec![Sigma(v(0)), Sigma(o(0))],
            vec![],
            vec![],
            vec![delta(o(2), o(1))],
        );
        assert_eq!(t1, t2);
        assert_ne!(t1, t2.scale(Scalar::from(2)));
    }
}
