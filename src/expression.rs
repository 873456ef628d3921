use duplicate::duplicate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::{Add, Mul, Neg, Sub};

use crate::scalar::Scalar;
use crate::term::Term;

/// An ordered sum of [`Term`]s. Addition concatenates, nothing is merged here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub terms: Vec<Term>,
}

impl Expression {
    pub fn new(terms: Vec<Term>) -> Self {
        Expression { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn scale(&self, s: Scalar) -> Expression {
        Expression {
            terms: self.terms.iter().map(|t| t.scale(s)).collect(),
        }
    }

    pub fn concat(&self, other: &Expression) -> Expression {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Expression { terms }
    }

    /// Every left term times every right term, left-major.
    pub fn cross_multiply(&self, other: &Expression) -> Expression {
        Expression {
            terms: self
                .terms
                .iter()
                .flat_map(|l| other.terms.iter().map(move |r| l.combine(r)))
                .collect(),
        }
    }

    /// Resolves the deltas of every term and drops the terms that became zero.
    pub fn resolve(&self) -> Expression {
        debug!("resolving {} terms", self.terms.len());
        let terms: Vec<Term> = self
            .terms
            .iter()
            .map(Term::resolve)
            .filter(|t| !t.is_zero())
            .collect();
        debug!("{} terms left after resolution", terms.len());
        Expression { terms }
    }

    pub fn are_operators(&self) -> bool {
        self.terms.iter().any(|t| !t.operators.is_empty())
    }
}

/// `A*B - B*A`
pub fn commute(a: &Expression, b: &Expression) -> Expression {
    a * b - b * a
}

impl From<Term> for Expression {
    fn from(value: Term) -> Self {
        Expression { terms: vec![value] }
    }
}

impl FromIterator<Term> for Expression {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Expression {
            terms: iter.into_iter().collect(),
        }
    }
}

/// Anything that can enter a product.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Scalar),
    Term(Term),
    Expression(Expression),
}

impl Operand {
    /// Scaling when either side is a number, term combination for two terms,
    /// and the cross product as soon as an expression is involved.
    pub fn product(self, rhs: Operand) -> Operand {
        match (self, rhs) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Operand::Scalar(a * b),
            (Operand::Scalar(s), Operand::Term(t)) | (Operand::Term(t), Operand::Scalar(s)) => {
                Operand::Term(t.scale(s))
            }
            (Operand::Scalar(s), Operand::Expression(e))
            | (Operand::Expression(e), Operand::Scalar(s)) => Operand::Expression(e.scale(s)),
            (Operand::Term(a), Operand::Term(b)) => Operand::Term(a.combine(&b)),
            (Operand::Term(a), Operand::Expression(b)) => {
                Operand::Expression(Expression::from(a).cross_multiply(&b))
            }
            (Operand::Expression(a), Operand::Term(b)) => {
                Operand::Expression(a.cross_multiply(&Expression::from(b)))
            }
            (Operand::Expression(a), Operand::Expression(b)) => {
                Operand::Expression(a.cross_multiply(&b))
            }
        }
    }

    pub fn into_expression(self) -> Expression {
        match self {
            Operand::Scalar(s) => Expression::from(Term::new(s, vec![], vec![], vec![], vec![])),
            Operand::Term(t) => Expression::from(t),
            Operand::Expression(e) => e,
        }
    }
}

impl From<Scalar> for Operand {
    fn from(value: Scalar) -> Self {
        Operand::Scalar(value)
    }
}

impl From<Term> for Operand {
    fn from(value: Term) -> Self {
        Operand::Term(value)
    }
}

impl From<Expression> for Operand {
    fn from(value: Expression) -> Self {
        Operand::Expression(value)
    }
}

duplicate! {
    [lhs rhs;
    [Expression] [Expression];
    [&Expression] [&Expression];
    [Expression] [&Expression];
    [&Expression] [Expression];]

impl Add<rhs> for lhs {
    type Output = Expression;
    fn add(self, other: rhs) -> Expression {
        self.concat(&other)
    }
}

impl Sub<rhs> for lhs {
    type Output = Expression;
    fn sub(self, other: rhs) -> Expression {
        self.concat(&other.scale(-Scalar::one()))
    }
}

impl Mul<rhs> for lhs {
    type Output = Expression;
    fn mul(self, other: rhs) -> Expression {
        self.cross_multiply(&other)
    }
}
}

duplicate! {
    [ex; [Expression]; [&Expression];]

impl Mul<Scalar> for ex {
    type Output = Expression;
    fn mul(self, rhs: Scalar) -> Expression {
        self.scale(rhs)
    }
}

impl Mul<ex> for Scalar {
    type Output = Expression;
    fn mul(self, rhs: ex) -> Expression {
        rhs.scale(self)
    }
}

impl Neg for ex {
    type Output = Expression;
    fn neg(self) -> Expression {
        self.scale(-Scalar::one())
    }
}
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
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
    use crate::operator::Operator;
    use crate::tensor::{Sigma, Tensor};

    fn ladder(name: &str, creation: bool) -> Expression {
        let p = Idx::new(0, "vir");
        Term::new(
            1,
            vec![Sigma(p.clone())],
            vec![Tensor::new(vec![p.clone()], name)],
            vec![Operator::fermion(p, creation)],
            vec![],
        )
        .into()
    }

    #[test]
    fn algebra() {
        let x = ladder("x", true);
        let y = ladder("y", false);

        assert_eq!((&x + &y).len(), 2);
        assert_eq!((&x * &y).len(), 1);
        assert_eq!(((&x + &y) * (&x + &y)).len(), 4);

        let diff = &x - &y;
        assert_eq!(diff.terms[1].scalar, Scalar::from(-1));

        let prod = &x * &y;
        assert_eq!(
            prod.terms[0].operators,
            vec![
                Operator::fermion(Idx::new(0, "vir"), true),
                Operator::fermion(Idx::new(1, "vir"), false)
            ]
        );
        assert_eq!(Scalar::fraction(1, 2) * &x, x.scale(Scalar::fraction(1, 2)));
        assert_eq!(-(-&x), x);

        assert_eq!(x.clone() + &y, &x + y.clone());
        assert_eq!((x.clone() - &y).terms[1].scalar, Scalar::from(-1));
        assert_eq!(x.clone() * &y, &x * y.clone());
    }

    #[test]
    fn commutator() {
        let x = ladder("x", true);
        let y = ladder("y", false);
        let c = commute(&x, &y);
        assert_eq!(c.len(), 2);
        assert_eq!(c.terms[0].scalar, Scalar::one());
        assert_eq!(c.terms[1].scalar, Scalar::from(-1));
        assert!(c.are_operators());
    }

    #[test]
    fn operand_dispatch() {
        let x = ladder("x", true);
        let t = x.terms[0].clone();

        let s = Operand::from(Scalar::from(2)).product(Scalar::from(3).into());
        assert_eq!(s, Operand::Scalar(Scalar::from(6)));

        let scaled = Operand::from(Scalar::from(2)).product(t.clone().into());
        assert_eq!(scaled, Operand::Term(t.scale(Scalar::from(2))));

        let tt = Operand::from(t.clone()).product(t.clone().into());
        assert_eq!(tt, Operand::Term(t.combine(&t)));

        let te = Operand::from(t.clone()).product(x.clone().into());
        assert_eq!(te.into_expression(), &x * &x);
    }

    #[test]
    fn resolve_drops_zeros() {
        let x = ladder("x", true);
        let mut zero = x.scale(Scalar::zero());
        zero.terms.push(x.terms[0].scale(Scalar::Float(1e-16)));
        let e = &x + &zero;
        assert_eq!(e.len(), 3);
        assert_eq!(e.resolve(), x);
    }
}
