use duplicate::duplicate;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::{Add, Mul, Neg, Sub};

use super::aterm::ATerm;
use crate::error::WickError;
use crate::expression::Expression;
use crate::scalar::Scalar;

/// A sum of [`ATerm`]s, merged under symmetry by [`AExpression::simplify`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AExpression {
    pub terms: Vec<ATerm>,
}

impl AExpression {
    /// Takes the terms as they are.
    pub fn new(terms: Vec<ATerm>) -> Self {
        AExpression { terms }
    }

    /// Simplified and sorted.
    pub fn canonical(terms: Vec<ATerm>) -> Self {
        let mut out = AExpression { terms };
        out.simplify();
        out.sort();
        out
    }

    /// Canonical form of a contracted expression. Fails if any term still
    /// carries operators.
    pub fn from_expression(ex: &Expression) -> Result<Self, WickError> {
        Self::from_expression_with(ex, true, true)
    }

    pub fn from_expression_with(
        ex: &Expression,
        simplify: bool,
        sort: bool,
    ) -> Result<Self, WickError> {
        let terms = ex
            .terms
            .iter()
            .map(ATerm::from_term)
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = AExpression { terms };
        if simplify {
            out.simplify();
        }
        if sort {
            out.sort();
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Folds every term into the first earlier term it matches under
    /// symmetry, then drops the zeros.
    pub fn simplify(&mut self) {
        debug!("simplifying {} terms", self.terms.len());
        let mut remaining: Vec<ATerm> = std::mem::take(&mut self.terms)
            .into_iter()
            .filter(|t| !t.is_zero())
            .collect();
        let mut out = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let mut first = remaining.remove(0);
            let mut rest = Vec::with_capacity(remaining.len());
            for t in remaining {
                match first.pmatch(&t) {
                    Some(sign) => {
                        trace!("merging {t} into {first} with sign {sign}");
                        first.scalar = first.scalar + Scalar::from(sign) * t.scalar;
                    }
                    None => rest.push(t),
                }
            }
            remaining = rest;
            out.push(first);
        }

        self.terms = out.into_iter().filter(|t| !t.is_zero()).collect();
        debug!("{} terms after simplification", self.terms.len());
    }

    /// Stable sort by [`ATerm::structural_cmp`].
    pub fn sort(&mut self) {
        self.terms.sort_by(ATerm::structural_cmp);
    }

    pub fn sort_tensors(&mut self) {
        for t in &mut self.terms {
            t.sort_tensors();
        }
    }

    pub fn connected(&self) -> Result<bool, WickError> {
        for t in &self.terms {
            if !t.connected()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The connected terms only.
    pub fn get_connected(&self, simplify: bool) -> Result<AExpression, WickError> {
        let mut terms = Vec::new();
        for t in &self.terms {
            if t.connected()? {
                terms.push(t.clone());
            }
        }
        Ok(if simplify {
            AExpression::canonical(terms)
        } else {
            AExpression::new(terms)
        })
    }

    /// Same number of terms, and every term of `self` matches some term of
    /// `other` under symmetry. Coefficients are not compared.
    pub fn pmatch(&self, other: &AExpression) -> bool {
        self.terms.len() == other.terms.len()
            && self
                .terms
                .iter()
                .all(|t1| other.terms.iter().any(|t2| t2.pmatch(t1).is_some()))
    }

    pub fn transpose(&mut self, perm: &[usize]) -> Result<(), WickError> {
        for t in &mut self.terms {
            t.transpose(perm)?;
        }
        Ok(())
    }

    /// Every coefficient times `s`, sorted but not simplified.
    pub fn scale(&self, s: Scalar) -> AExpression {
        let mut out = AExpression {
            terms: self.terms.iter().map(|t| t.scale(s)).collect(),
        };
        out.sort();
        out
    }

    /// Cross product of the terms, simplified.
    pub fn cross_multiply(&self, other: &AExpression) -> AExpression {
        AExpression::canonical(
            self.terms
                .iter()
                .flat_map(|l| other.terms.iter().map(move |r| l.combine(r)))
                .collect(),
        )
    }

    /// Concatenation, simplified.
    pub fn concat(&self, other: &AExpression) -> AExpression {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        AExpression::canonical(terms)
    }
}

impl TryFrom<&Expression> for AExpression {
    type Error = WickError;

    fn try_from(value: &Expression) -> Result<Self, Self::Error> {
        AExpression::from_expression(value)
    }
}

duplicate! {
    [lhs rhs;
    [AExpression] [AExpression];
    [&AExpression] [&AExpression];
    [AExpression] [&AExpression];
    [&AExpression] [AExpression];]

impl Add<rhs> for lhs {
    type Output = AExpression;
    fn add(self, other: rhs) -> AExpression {
        self.concat(&other)
    }
}

impl Sub<rhs> for lhs {
    type Output = AExpression;
    fn sub(self, other: rhs) -> AExpression {
        self.concat(&other.scale(-Scalar::one()))
    }
}

impl Mul<rhs> for lhs {
    type Output = AExpression;
    fn mul(self, other: rhs) -> AExpression {
        self.cross_multiply(&other)
    }
}
}

duplicate! {
    [ex; [AExpression]; [&AExpression];]

impl Mul<Scalar> for ex {
    type Output = AExpression;
    fn mul(self, rhs: Scalar) -> AExpression {
        self.scale(rhs)
    }
}

impl Mul<ex> for Scalar {
    type Output = AExpression;
    fn mul(self, rhs: ex) -> AExpression {
        rhs.scale(self)
    }
}

impl Neg for ex {
    type Output = AExpression;
    fn neg(self) -> AExpression {
        self.scale(-Scalar::one())
    }
}
}

impl Display for AExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Idx;
    use crate::tensor::{Sigma, Tensor, TensorSym};

    fn o(i: usize) -> Idx {
        Idx::new(i, "occ")
    }

    fn v(i: usize) -> Idx {
        Idx::new(i, "vir")
    }

    fn anti(indices: Vec<Idx>) -> Tensor {
        Tensor::with_sym(indices, "I", TensorSym::antisymmetric_two_body()).unwrap()
    }

    fn direct(s: Scalar) -> ATerm {
        ATerm::new(
            s,
            vec![Sigma(o(0)), Sigma(o(1))],
            vec![anti(vec![o(0), o(1), o(0), o(1)])],
        )
    }

    fn exchange(s: Scalar) -> ATerm {
        ATerm::new(
            s,
            vec![Sigma(o(0)), Sigma(o(1))],
            vec![anti(vec![o(0), o(1), o(1), o(0)])],
        )
    }

    #[test]
    fn simplify_merges_symmetric_twins() {
        let mut e = AExpression::new(vec![
            exchange(Scalar::fraction(-1, 4)),
            direct(Scalar::fraction(1, 4)),
        ]);
        e.simplify();
        assert_eq!(e.len(), 1);
        assert_eq!(e.terms[0].scalar, Scalar::fraction(-1, 2));
    }

    #[test]
    fn simplify_cancels() {
        let mut e = AExpression::new(vec![
            direct(Scalar::fraction(1, 2)),
            exchange(Scalar::fraction(1, 2)),
            direct(Scalar::zero()),
        ]);
        e.simplify();
        assert!(e.is_empty());
    }

    #[test]
    fn sort_and_connected() {
        let f = ATerm::new(
            1,
            vec![Sigma(o(0)), Sigma(v(0))],
            vec![Tensor::new(vec![o(0), v(0)], "f"), Tensor::new(vec![v(0), o(0)], "t")],
        );
        let apart = ATerm::new(
            1,
            vec![Sigma(o(0)), Sigma(v(0))],
            vec![Tensor::new(vec![o(0), o(0)], "f"), Tensor::new(vec![v(0), v(0)], "t")],
        );
        let e0 = ATerm::new(2, vec![], vec![Tensor::new(vec![], "E")]);
        let mut e = AExpression::new(vec![f.clone(), e0.clone(), apart]);
        assert!(!e.connected().unwrap());

        let c = e.get_connected(false).unwrap();
        assert_eq!(c.len(), 2);
        assert!(c.connected().unwrap());

        e.sort();
        assert_eq!(e.terms[0], e0);
        assert_eq!(e.terms[1].tensors[0].indices, vec![o(0), o(0)]);
        assert_eq!(e.terms[2], f);
    }

    #[test]
    fn algebra() {
        let a = AExpression::new(vec![direct(Scalar::one())]);
        let b = AExpression::new(vec![exchange(Scalar::one())]);

        let sum = &a + &b;
        assert!(sum.is_empty());
        let diff = &a - &b;
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.terms[0].scalar, Scalar::from(2));

        let sq = &a * &a;
        assert_eq!(sq.len(), 1);
        assert_eq!(sq.terms[0].tensors.len(), 2);
        assert_eq!(sq.terms[0].sums.len(), 4);

        assert!(a.pmatch(&b));
        assert!((Scalar::from(3) * &a).pmatch(&a));
        assert_eq!((-&a).terms[0].scalar, Scalar::from(-1));

        let ab = a.clone() + &b.scale(Scalar::from(2));
        assert_eq!(ab.len(), 1);
        assert_eq!((&a - b.clone()).terms[0].scalar, Scalar::from(2));
        assert_eq!((a.clone() * &a).len(), 1);
    }

    #[test]
    fn scaling_sorts_without_merging() {
        let e0 = ATerm::new(2, vec![], vec![Tensor::new(vec![], "E")]);
        let e = AExpression::new(vec![
            direct(Scalar::one()),
            exchange(Scalar::one()),
            e0.clone(),
        ]);
        let s = Scalar::fraction(1, 2) * &e;
        assert_eq!(s.len(), 3);
        assert_eq!(s.terms[0], e0.scale(Scalar::fraction(1, 2)));
        assert_eq!(s.terms[1].scalar, Scalar::fraction(1, 2));
    }

    #[test]
    fn transpose() {
        let mut e = AExpression::new(vec![ATerm::new(
            1,
            vec![],
            vec![
                Tensor::external(vec![v(0)]),
                Tensor::external(vec![o(0)]),
                Tensor::new(vec![v(0), o(0)], "f"),
            ],
        )]);
        e.transpose(&[1, 0]).unwrap();
        assert_eq!(e.terms[0].tensors[0].indices, vec![o(0), v(0)]);
    }
}
