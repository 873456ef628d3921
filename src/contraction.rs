use log::{debug, trace};

use crate::error::WickError;
use crate::expression::Expression;
use crate::index::Occupation;
use crate::operator::Operator;
use crate::permutation::Permutation;
use crate::scalar::Scalar;
use crate::tensor::Delta;
use crate::term::Term;
use crate::utils::Odometer;

/// Whether `o1` may be contracted with a later `o2`.
///
/// Both must be ladder operators of the same kind and space. A fermion pair
/// needs `o1` to be an occupied creator facing an annihilator, or a virtual
/// annihilator facing a creator. A boson pair needs an annihilator facing a
/// creator.
pub fn valid_contraction(o1: &Operator, o2: &Operator, occ: &Occupation) -> bool {
    match (o1, o2) {
        (
            Operator::Fermion {
                idx: i1,
                creation: c1,
            },
            Operator::Fermion {
                idx: i2,
                creation: c2,
            },
        ) if i1.same_space(i2) => {
            if occ.is_occupied(i1) {
                *c1 && !*c2
            } else {
                !*c1 && *c2
            }
        }
        (
            Operator::Boson {
                idx: i1,
                creation: c1,
            },
            Operator::Boson {
                idx: i2,
                creation: c2,
            },
        ) if i1.same_space(i2) => !*c1 && *c2,
        _ => false,
    }
}

/// All perfect matchings of `items` in which each pair `(i, j)`, `i < j`,
/// satisfies `valid(items[i], items[j])`.
///
/// The first unmatched item is always paired with some later one, so every
/// matching appears once. Pairs inside a matching are sorted and matchings
/// come out in lexicographic order. Empty or odd inputs have no matchings.
pub fn pair_list<T>(items: &[T], valid: impl Fn(&T, &T) -> bool) -> Vec<Vec<(usize, usize)>> {
    let mut out = Vec::new();
    if items.is_empty() || items.len() % 2 == 1 {
        return out;
    }

    let mut stack: Vec<(Vec<usize>, Vec<(usize, usize)>)> =
        vec![((0..items.len()).collect(), Vec::new())];

    while let Some((remaining, pairs)) = stack.pop() {
        let Some((&first, rest)) = remaining.split_first() else {
            out.push(pairs);
            continue;
        };
        // pushed in reverse so that the smallest partner is expanded first
        for (k, &partner) in rest.iter().enumerate().rev() {
            if !valid(&items[first], &items[partner]) {
                continue;
            }
            let mut next_remaining = rest.to_vec();
            next_remaining.remove(k);
            let mut next_pairs = pairs.clone();
            next_pairs.push((first, partner));
            stack.push((next_remaining, next_pairs));
        }
    }
    out
}

/// Sign of a pairing: the parity of the permutation that brings every pair
/// next to each other, which is +1 for an even number of crossing chords.
pub fn get_sign(pairs: &[(usize, usize)]) -> i8 {
    let flat: Vec<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    Permutation::sort(&flat).parity()
}

/// Splits an operator string on projectors. `k` projectors give `k + 1`
/// segments, some possibly empty.
pub fn split_operators(ops: &[Operator]) -> Vec<&[Operator]> {
    ops.split(Operator::is_projector).collect()
}

/// Every full contraction of one segment as its deltas and sign.
fn contract_segment(
    ops: &[Operator],
    occ: &Occupation,
) -> Result<Vec<(Vec<Delta>, i8)>, WickError> {
    if ops.len() % 2 == 1 {
        return Err(WickError::OddSegment(ops.len()));
    }

    let mut out = Vec::new();
    for pairs in pair_list(ops, |a, b| valid_contraction(a, b, occ)) {
        let mut deltas = Vec::with_capacity(pairs.len());
        let mut fermion_pairs = Vec::new();
        for &(i, j) in &pairs {
            if let (Some(a), Some(b)) = (ops[i].idx(), ops[j].idx()) {
                deltas.push(Delta::new(a.clone(), b.clone())?);
            }
            if ops[i].is_fermion() {
                fermion_pairs.push((i, j));
            }
        }
        out.push((deltas, get_sign(&fermion_pairs)));
    }
    Ok(out)
}

/// Replaces the operators of every term by the sum over their full
/// contractions.
///
/// Projector-delimited segments are contracted independently and their
/// contractions multiplied out. A term with an odd segment, or with a segment
/// that admits no contraction, vanishes. A term without operators passes
/// through unchanged.
pub fn apply_wick(e: &Expression, occ: &Occupation) -> Result<Expression, WickError> {
    debug!("applying Wick's theorem to {} terms", e.len());
    let mut out = Vec::new();

    for term in &e.terms {
        let segments = split_operators(&term.operators);
        if segments.iter().all(|s| s.is_empty()) {
            out.push(Term {
                operators: vec![],
                ..term.clone()
            });
            continue;
        }
        if segments.iter().any(|s| s.len() % 2 == 1) {
            trace!("dropping term with an odd segment: {term}");
            continue;
        }

        let contracted = segments
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| contract_segment(s, occ))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(
            "{} contractions per segment for {term}",
            contracted
                .iter()
                .map(|c| c.len().to_string())
                .collect::<Vec<_>>()
                .join("x")
        );

        for choice in Odometer::new(contracted.iter().map(Vec::len).collect()) {
            let mut sign = 1i8;
            let mut deltas = Vec::new();
            for (segment, &c) in contracted.iter().zip(&choice) {
                let (d, s) = &segment[c];
                sign *= s;
                deltas.extend(d.iter().cloned());
            }
            deltas.extend(term.deltas.iter().cloned());
            out.push(Term {
                scalar: Scalar::from(sign) * term.scalar,
                sums: term.sums.clone(),
                tensors: term.tensors.clone(),
                operators: vec![],
                deltas,
            });
        }
    }

    let out = Expression::new(out);
    if out.are_operators() {
        let remaining = out.terms.iter().filter(|t| !t.operators.is_empty()).count();
        return Err(WickError::OperatorsRemain(remaining));
    }
    debug!("Wick's theorem produced {} terms", out.len());
    Ok(out)
}
