//! Text forms of terms and expressions.
//!
//! Indices are printed with one-character labels drawn, per space and in
//! order, from an [`IndexKey`]. Besides the LaTeX-like form there is an
//! `einsum` form meant to be pasted into numerical code.

use ahash::AHashMap;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::canonical::{AExpression, ATerm};
use crate::error::WickError;
use crate::expression::Expression;
use crate::index::Idx;
use crate::operator::Operator;
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use crate::term::Term;

/// Label alphabet of every index space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexKey(pub IndexMap<String, String>);

impl Default for IndexKey {
    fn default() -> Self {
        IndexKey(
            [("occ", "ijklmnop"), ("vir", "abcdefgh"), ("nm", "IJKLMNOP")]
                .into_iter()
                .map(|(s, l)| (s.to_string(), l.to_string()))
                .collect(),
        )
    }
}

impl IndexKey {
    /// Reads a key from a JSON object such as `{"occ": "ijk", "vir": "abc"}`.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing index key")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading index key from {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Assigns labels to `indices` in order, each space counting separately.
    pub fn labels<'a>(
        &self,
        indices: impl IntoIterator<Item = &'a Idx>,
    ) -> Result<AHashMap<Idx, char>, WickError> {
        let mut used: AHashMap<&str, usize> = AHashMap::new();
        let mut out = AHashMap::new();
        for idx in indices {
            if out.contains_key(idx) {
                continue;
            }
            let n = used.entry(idx.space.as_str()).or_insert(0);
            let label = self
                .0
                .get(&idx.space)
                .and_then(|l| l.chars().nth(*n))
                .ok_or_else(|| WickError::MissingLabel(idx.clone()))?;
            *n += 1;
            out.insert(idx.clone(), label);
        }
        Ok(out)
    }
}

type Labels = AHashMap<Idx, char>;

fn label(labels: &Labels, idx: &Idx) -> Result<char, WickError> {
    labels
        .get(idx)
        .copied()
        .ok_or_else(|| WickError::MissingLabel(idx.clone()))
}

fn index_string(labels: &Labels, indices: &[Idx]) -> Result<String, WickError> {
    indices.iter().map(|i| label(labels, i)).collect()
}

fn tensor_string(labels: &Labels, t: &Tensor) -> Result<String, WickError> {
    if t.is_external() {
        return Ok(String::new());
    }
    Ok(format!("{}_{{{}}}", t.name, index_string(labels, &t.indices)?))
}

fn operator_string(labels: &Labels, o: &Operator) -> Result<String, WickError> {
    Ok(match o {
        Operator::Fermion { idx, creation: true } => format!("a^{{\\dagger}}_{}", label(labels, idx)?),
        Operator::Fermion { idx, creation: false } => format!("a_{}", label(labels, idx)?),
        Operator::Boson { idx, creation: true } => format!("b^{{\\dagger}}_{}", label(labels, idx)?),
        Operator::Boson { idx, creation: false } => format!("b_{}", label(labels, idx)?),
        Operator::Projector => "P".to_string(),
    })
}

fn sign_and_magnitude(s: &Scalar) -> (&'static str, Scalar) {
    if s.is_positive() {
        (" + ", *s)
    } else {
        (" - ", s.abs())
    }
}

fn float_string(s: &Scalar) -> String {
    format!("{:?}", s.to_f64())
}

/// Text form with a configurable index alphabet.
pub trait Render {
    fn render(&self, key: &IndexKey) -> Result<String, WickError>;
}

fn term_body(t: &Term, key: &IndexKey) -> Result<String, WickError> {
    let ilist = t.ilist();
    let labels = key.labels(&ilist)?;
    let mut out = String::new();
    for s in &t.sums {
        out.push_str(&format!("\\sum_{{{}}}", label(&labels, &s.0)?));
    }
    for d in &t.deltas {
        out.push_str(&format!(
            "\\delta_{{{}{}}}",
            label(&labels, &d.i1)?,
            label(&labels, &d.i2)?
        ));
    }
    for tensor in &t.tensors {
        out.push_str(&tensor_string(&labels, tensor)?);
    }
    for o in &t.operators {
        out.push_str(&operator_string(&labels, o)?);
    }
    Ok(out)
}

impl Render for Term {
    fn render(&self, key: &IndexKey) -> Result<String, WickError> {
        Ok(format!("{}{}", self.scalar, term_body(self, key)?))
    }
}

impl Render for Expression {
    /// One line per term, each led by its sign.
    fn render(&self, key: &IndexKey) -> Result<String, WickError> {
        let lines = self
            .terms
            .iter()
            .map(|t| {
                let (sign, magnitude) = sign_and_magnitude(&t.scalar);
                Ok(format!("{sign}{magnitude}{}", term_body(t, key)?))
            })
            .collect::<Result<Vec<_>, WickError>>()?;
        Ok(lines.join("\n"))
    }
}

fn aterm_body(t: &ATerm, labels: &Labels) -> Result<String, WickError> {
    let mut out = String::new();
    if !t.sums.is_empty() {
        let sums: String = t
            .sums
            .iter()
            .map(|s| label(labels, &s.0))
            .collect::<Result<_, _>>()?;
        out.push_str(&format!("\\sum_{{{sums}}}"));
    }
    for tensor in &t.tensors {
        out.push_str(&tensor_string(labels, tensor)?);
    }
    Ok(out)
}

impl Render for ATerm {
    fn render(&self, key: &IndexKey) -> Result<String, WickError> {
        let labels = key.labels(&self.ilist())?;
        Ok(format!(
            "{}{}",
            float_string(&self.scalar),
            aterm_body(self, &labels)?
        ))
    }
}

impl Render for AExpression {
    fn render(&self, key: &IndexKey) -> Result<String, WickError> {
        let lines = self
            .terms
            .iter()
            .map(|t| {
                let labels = key.labels(&t.ilist())?;
                let (sign, magnitude) = sign_and_magnitude(&t.scalar);
                Ok(format!(
                    "{sign}{}{}",
                    float_string(&magnitude),
                    aterm_body(t, &labels)?
                ))
            })
            .collect::<Result<Vec<_>, WickError>>()?;
        Ok(lines.join("\n"))
    }
}

/// `scalar*einsum('inputs->outputs', names...)`, the outputs being the
/// indices of the external tensors.
pub fn einsum(t: &ATerm, key: &IndexKey) -> Result<String, WickError> {
    let labels = key.labels(&t.ilist())?;
    let mut inputs = Vec::new();
    let mut outputs = String::new();
    let mut names = String::new();
    for tensor in &t.tensors {
        let indices = index_string(&labels, &tensor.indices)?;
        if tensor.is_external() {
            outputs.push_str(&indices);
        } else {
            inputs.push(indices);
            names.push_str(&format!(", {}", tensor.name));
        }
    }
    Ok(format!(
        "{}*einsum('{}->{}'{})",
        float_string(&t.scalar),
        inputs.join(","),
        outputs,
        names
    ))
}

/// One `lhs += einsum(...)` line per term.
pub fn einsum_lines(e: &AExpression, lhs: &str, key: &IndexKey) -> Result<String, WickError> {
    let lines = e
        .terms
        .iter()
        .map(|t| Ok(format!("{lhs} += {}", einsum(t, key)?)))
        .collect::<Result<Vec<_>, WickError>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{Delta, Sigma};
    use insta::assert_snapshot;

    fn o(i: usize) -> Idx {
        Idx::new(i, "occ")
    }

    fn v(i: usize) -> Idx {
        Idx::new(i, "vir")
    }

    fn ft() -> ATerm {
        ATerm::new(
            Scalar::fraction(1, 2),
            vec![Sigma(o(0)), Sigma(v(0))],
            vec![
                Tensor::external(vec![v(1), o(1)]),
                Tensor::new(vec![o(0), v(0)], "f"),
                Tensor::new(vec![v(0), o(1)], "t"),
                Tensor::new(vec![v(1), o(0)], "t"),
            ],
        )
    }

    #[test]
    fn key_from_json() {
        let key = IndexKey::from_json(r#"{"occ": "ij", "vir": "ab"}"#).unwrap();
        assert_eq!(key.0["occ"], "ij");
        assert!(IndexKey::from_json("[1, 2]").is_err());

        let labels = key.labels(&[o(3), v(0), o(1), o(3)]).unwrap();
        assert_eq!(labels[&o(3)], 'i');
        assert_eq!(labels[&o(1)], 'j');
        assert_eq!(labels[&v(0)], 'a');
        assert_eq!(
            key.labels(&[o(0), o(1), o(2)]),
            Err(WickError::MissingLabel(o(2)))
        );
        assert!(key.labels(&[Idx::boson(0, "nm")]).is_err());
    }

    #[test]
    fn term_forms() {
        let t = Term::new(
            Scalar::fraction(-1, 2),
            vec![Sigma(o(0))],
            vec![Tensor::new(vec![o(0), v(0)], "f")],
            vec![Operator::fermion(v(0), true), Operator::fermion(o(1), false)],
            vec![Delta::new(o(1), o(2)).unwrap()],
        );
        let key = IndexKey::default();
        assert_snapshot!(t.render(&key).unwrap(), @r"-1/2\sum_{i}\delta_{jk}f_{ia}a^{\dagger}_aa_j");
        assert_eq!(
            Expression::from(t).render(&key).unwrap(),
            r" - 1/2\sum_{i}\delta_{jk}f_{ia}a^{\dagger}_aa_j"
        );
    }

    #[test]
    fn aterm_forms() {
        let key = IndexKey::default();
        let t = ft();
        assert_snapshot!(t.render(&key).unwrap(), @r"0.5\sum_{jb}f_{jb}t_{bi}t_{aj}");
        assert_snapshot!(einsum(&t, &key).unwrap(), @"0.5*einsum('jb,bi,aj->ai', f, t, t)");

        let e = AExpression::new(vec![t.clone(), t.scale(Scalar::from(-2))]);
        assert_snapshot!(einsum_lines(&e, "T1", &key).unwrap(), @r"
        T1 += 0.5*einsum('jb,bi,aj->ai', f, t, t)
        T1 += -1.0*einsum('jb,bi,aj->ai', f, t, t)
        ");
        assert_eq!(
            e.render(&key).unwrap(),
            " + 0.5\\sum_{jb}f_{jb}t_{bi}t_{aj}\n - 1.0\\sum_{jb}f_{jb}t_{bi}t_{aj}"
        );
    }
}
