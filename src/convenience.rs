//! Ready-made operators and projectors.
//!
//! Excitation operators, one- and two-body Hamiltonian pieces and the bra/ket
//! projectors used to build residual equations. Space arguments name index
//! spaces; with the default [`Occupation`] a space is occupied when its name
//! contains an `o`.
//!
//! Bra projectors carry an external tensor (empty name) listing their free
//! indices in the order `virtual..., occupied...`, ket projectors in the
//! reverse order.

use crate::error::WickError;
use crate::expression::Expression;
use crate::index::{Idx, Occupation};
use crate::operator::{normal_ordered, Operator};
use crate::scalar::Scalar;
use crate::tensor::{Sigma, Tensor, TensorSym};
use crate::term::Term;

fn create(idx: &Idx) -> Operator {
    Operator::fermion(idx.clone(), true)
}

fn destroy(idx: &Idx) -> Operator {
    Operator::fermion(idx.clone(), false)
}

fn bcreate(idx: &Idx) -> Operator {
    Operator::boson(idx.clone(), true)
}

fn bdestroy(idx: &Idx) -> Operator {
    Operator::boson(idx.clone(), false)
}

fn sums(indices: &[&Idx]) -> Vec<Sigma> {
    indices.iter().map(|&i| Sigma(i.clone())).collect()
}

/// Label of the next index in `space`, counting earlier spaces equal to it.
fn next_label(space: &str, earlier: &[&str]) -> usize {
    earlier.iter().filter(|&&s| s == space).count()
}

fn maybe_normal_ordered(ops: Vec<Operator>, norder: bool) -> Result<(Vec<Operator>, i8), WickError> {
    if norder {
        normal_ordered(&ops, &Occupation::Default)
    } else {
        Ok((ops, 1))
    }
}

/// A single operator-only term with the free indices in an external tensor.
fn projector(free: Vec<Idx>, operators: Vec<Operator>) -> Expression {
    Expression::from(Term::new(
        1,
        vec![],
        vec![Tensor::external(free)],
        operators,
        vec![],
    ))
}

/// `sum_pq f_pq p^+ q` over every pair of spaces.
pub fn one_e(name: &str, spaces: &[&str], norder: bool) -> Result<Expression, WickError> {
    let mut terms = Vec::new();
    for &s1 in spaces {
        let p = Idx::new(0, s1);
        for &s2 in spaces {
            let q = Idx::new(next_label(s2, &[s1]), s2);
            let (operators, sign) = maybe_normal_ordered(vec![create(&p), destroy(&q)], norder)?;
            terms.push(Term::new(
                sign,
                sums(&[&p, &q]),
                vec![Tensor::new(vec![p.clone(), q.clone()], name)],
                operators,
                vec![],
            ));
        }
    }
    Ok(Expression::new(terms))
}

fn two_e_term(
    name: &str,
    [s1, s2, s3, s4]: [&str; 4],
    scalar: Scalar,
    sym: &TensorSym,
    norder: bool,
) -> Result<Term, WickError> {
    let p = Idx::new(0, s1);
    let q = Idx::new(next_label(s2, &[s1]), s2);
    let r = Idx::new(next_label(s3, &[s1, s2]), s3);
    let s = Idx::new(next_label(s4, &[s1, s2, s3]), s4);
    let (operators, sign) = maybe_normal_ordered(
        vec![create(&p), create(&q), destroy(&s), destroy(&r)],
        norder,
    )?;
    let tensor = Tensor::with_sym(
        vec![p.clone(), q.clone(), r.clone(), s.clone()],
        name,
        sym.clone(),
    )?;
    Ok(Term::new(
        Scalar::from(sign) * scalar,
        sums(&[&p, &q, &r, &s]),
        vec![tensor],
        operators,
        vec![],
    ))
}

/// The two-body operator `sum_pqrs v_pqrs p^+ q^+ s r`.
///
/// The full form runs over every quadruple of spaces with prefactor 1/4
/// (antisymmetrized) or 1/2. The compressed form keeps only ordered pairs of
/// spaces on each side and is available for antisymmetrized integrals only.
pub fn two_e(
    name: &str,
    spaces: &[&str],
    anti: bool,
    norder: bool,
    compress: bool,
) -> Result<Expression, WickError> {
    let sym = TensorSym::two_body(anti);
    let half = Scalar::fraction(1, 2);
    let mut terms = Vec::new();

    if compress {
        if !anti {
            return Err(WickError::UnsupportedConfiguration(
                "compressed two-body operator without antisymmetry".into(),
            ));
        }
        for (i1, &s1) in spaces.iter().enumerate() {
            for &s2 in &spaces[i1..] {
                let bra = if s1 == s2 { half } else { Scalar::one() };
                for (i3, &s3) in spaces.iter().enumerate() {
                    for &s4 in &spaces[i3..] {
                        let ket = if s3 == s4 { half } else { Scalar::one() };
                        terms.push(two_e_term(name, [s1, s2, s3, s4], bra * ket, &sym, norder)?);
                    }
                }
            }
        }
    } else {
        let fac = if anti { Scalar::fraction(1, 4) } else { half };
        for &s1 in spaces {
            for &s2 in spaces {
                for &s3 in spaces {
                    for &s4 in spaces {
                        terms.push(two_e_term(name, [s1, s2, s3, s4], fac, &sym, norder)?);
                    }
                }
            }
        }
    }
    Ok(Expression::new(terms))
}

/// `sum_x (g'_x b^+_x + g_x b_x)`; `name2` names the creation piece.
pub fn one_p(name: &str, space: &str, name2: Option<&str>) -> Expression {
    let x = Idx::boson(0, space);
    let tc = Term::new(
        1,
        sums(&[&x]),
        vec![Tensor::new(vec![x.clone()], name2.unwrap_or(name))],
        vec![bcreate(&x)],
        vec![],
    );
    let ta = Term::new(
        1,
        sums(&[&x]),
        vec![Tensor::new(vec![x.clone()], name)],
        vec![bdestroy(&x)],
        vec![],
    );
    Expression::new(vec![tc, ta])
}

/// `sum_xy w_xy b^+_x b_y`
pub fn two_p(name: &str, space: &str) -> Expression {
    let x = Idx::boson(0, space);
    let y = Idx::boson(1, space);
    Expression::from(Term::new(
        1,
        sums(&[&x, &y]),
        vec![Tensor::new(vec![x.clone(), y.clone()], name)],
        vec![bcreate(&x), bdestroy(&y)],
        vec![],
    ))
}

/// Linear electron-boson coupling `sum_xpq (g'_xpq b^+_x + g_xpq b_x) p^+ q`.
pub fn ep11(
    name: &str,
    fspaces: &[&str],
    bspaces: &[&str],
    norder: bool,
    name2: Option<&str>,
) -> Result<Expression, WickError> {
    let name2 = name2.unwrap_or(name);
    let mut terms = Vec::new();
    for &sb in bspaces {
        let x = Idx::boson(0, sb);
        for &s1 in fspaces {
            let p1 = Idx::new(0, s1);
            for &s2 in fspaces {
                let p2 = Idx::new(next_label(s2, &[s1]), s2);
                for (boson, tname) in [(bdestroy(&x), name), (bcreate(&x), name2)] {
                    let (fermions, sign) =
                        maybe_normal_ordered(vec![create(&p1), destroy(&p2)], norder)?;
                    let mut operators = vec![boson];
                    operators.extend(fermions);
                    terms.push(Term::new(
                        sign,
                        sums(&[&x, &p1, &p2]),
                        vec![Tensor::new(vec![x.clone(), p1.clone(), p2.clone()], tname)],
                        operators,
                        vec![],
                    ));
                }
            }
        }
    }
    Ok(Expression::new(terms))
}

/// A constant times the identity.
pub fn e0(name: &str) -> Expression {
    Expression::from(Term::new(
        1,
        vec![],
        vec![Tensor::new(vec![], name)],
        vec![],
        vec![],
    ))
}

/// Single excitations `sum_ia t_ai a^+ i`.
pub fn e1(name: &str, ospaces: &[&str], vspaces: &[&str]) -> Expression {
    let mut terms = Vec::new();
    for &os in ospaces {
        for &vs in vspaces {
            let i = Idx::new(0, os);
            let a = Idx::new(0, vs);
            terms.push(Term::new(
                1,
                sums(&[&i, &a]),
                vec![Tensor::new(vec![a.clone(), i.clone()], name)],
                vec![create(&a), destroy(&i)],
                vec![],
            ));
        }
    }
    Expression::new(terms)
}

/// Double excitations `1/4 sum_ijab t_abij a^+ b^+ j i`, one term per
/// unordered pair of occupied and of virtual spaces.
pub fn e2(name: &str, ospaces: &[&str], vspaces: &[&str]) -> Result<Expression, WickError> {
    let sym = TensorSym::antisymmetric_two_body();
    let mut terms = Vec::new();
    for (i1, &o1) in ospaces.iter().enumerate() {
        for &o2 in &ospaces[i1..] {
            for (j1, &v1) in vspaces.iter().enumerate() {
                for &v2 in &vspaces[j1..] {
                    let i = Idx::new(0, o1);
                    let a = Idx::new(0, v1);
                    let j = Idx::new(1, o2);
                    let b = Idx::new(1, v2);
                    let mut scalar = Scalar::one();
                    if o1 == o2 {
                        scalar = scalar * Scalar::fraction(1, 2);
                    }
                    if v1 == v2 {
                        scalar = scalar * Scalar::fraction(1, 2);
                    }
                    terms.push(Term::new(
                        scalar,
                        sums(&[&i, &a, &j, &b]),
                        vec![Tensor::with_sym(
                            vec![a.clone(), b.clone(), i.clone(), j.clone()],
                            name,
                            sym.clone(),
                        )?],
                        vec![create(&a), create(&b), destroy(&j), destroy(&i)],
                        vec![],
                    ));
                }
            }
        }
    }
    Ok(Expression::new(terms))
}

/// Ionization `sum_i r_i i`.
pub fn eip1(name: &str, ospaces: &[&str]) -> Expression {
    ospaces
        .iter()
        .map(|&os| {
            let i = Idx::new(0, os);
            Term::new(
                1,
                sums(&[&i]),
                vec![Tensor::new(vec![i.clone()], name)],
                vec![destroy(&i)],
                vec![],
            )
        })
        .collect()
}

/// Ionized trions `1/2 sum_ija r_aij a^+ j i`.
pub fn eip2(name: &str, ospaces: &[&str], vspaces: &[&str]) -> Result<Expression, WickError> {
    let sym = TensorSym::ip2();
    let mut terms = Vec::new();
    for (i1, &o1) in ospaces.iter().enumerate() {
        for &o2 in &ospaces[i1..] {
            for &v1 in vspaces {
                let i = Idx::new(0, o1);
                let a = Idx::new(0, v1);
                let j = Idx::new(1, o2);
                terms.push(Term::new(
                    Scalar::fraction(1, 2),
                    sums(&[&i, &a, &j]),
                    vec![Tensor::with_sym(
                        vec![a.clone(), i.clone(), j.clone()],
                        name,
                        sym.clone(),
                    )?],
                    vec![create(&a), destroy(&j), destroy(&i)],
                    vec![],
                ));
            }
        }
    }
    Ok(Expression::new(terms))
}

/// Attachment `sum_a r_a a^+`.
pub fn eea1(name: &str, vspaces: &[&str]) -> Expression {
    vspaces
        .iter()
        .map(|&vs| {
            let a = Idx::new(0, vs);
            Term::new(
                1,
                sums(&[&a]),
                vec![Tensor::new(vec![a.clone()], name)],
                vec![create(&a)],
                vec![],
            )
        })
        .collect()
}

/// Attached trions `1/2 sum_abi r_bai b^+ a^+ i`.
pub fn eea2(name: &str, ospaces: &[&str], vspaces: &[&str]) -> Result<Expression, WickError> {
    let sym = TensorSym::ea2();
    let mut terms = Vec::new();
    for &o1 in ospaces {
        for (j1, &v1) in vspaces.iter().enumerate() {
            for &v2 in &vspaces[j1..] {
                let i = Idx::new(0, o1);
                let a = Idx::new(0, v1);
                let b = Idx::new(1, v2);
                terms.push(Term::new(
                    Scalar::fraction(1, 2),
                    sums(&[&i, &a, &b]),
                    vec![Tensor::with_sym(
                        vec![b.clone(), a.clone(), i.clone()],
                        name,
                        sym.clone(),
                    )?],
                    vec![create(&b), create(&a), destroy(&i)],
                    vec![],
                ));
            }
        }
    }
    Ok(Expression::new(terms))
}

/// Boson excitation `sum_x s_x b^+_x`.
pub fn p1(name: &str, spaces: &[&str]) -> Expression {
    spaces
        .iter()
        .map(|&s| {
            let x = Idx::boson(0, s);
            Term::new(
                1,
                sums(&[&x]),
                vec![Tensor::new(vec![x.clone()], name)],
                vec![bcreate(&x)],
                vec![],
            )
        })
        .collect()
}

/// Boson double excitation `1/2 sum_xy s_xy b^+_x b^+_y`.
pub fn p2(name: &str, spaces: &[&str]) -> Result<Expression, WickError> {
    let mut terms = Vec::new();
    for &s1 in spaces {
        for &s2 in spaces {
            let x = Idx::boson(0, s1);
            let y = Idx::boson(next_label(s2, &[s1]), s2);
            terms.push(Term::new(
                Scalar::fraction(1, 2),
                sums(&[&x, &y]),
                vec![Tensor::with_sym(
                    vec![x.clone(), y.clone()],
                    name,
                    TensorSym::symmetric_pair(),
                )?],
                vec![bcreate(&x), bcreate(&y)],
                vec![],
            ));
        }
    }
    Ok(Expression::new(terms))
}

/// Coupled excitation `sum_xia u_xai b^+_x a^+ i`.
pub fn eps1(name: &str, bspaces: &[&str], ospaces: &[&str], vspaces: &[&str]) -> Expression {
    let mut terms = Vec::new();
    for &bs in bspaces {
        for &os in ospaces {
            for &vs in vspaces {
                let x = Idx::boson(0, bs);
                let i = Idx::new(0, os);
                let a = Idx::new(0, vs);
                terms.push(Term::new(
                    1,
                    sums(&[&x, &i, &a]),
                    vec![Tensor::new(vec![x.clone(), a.clone(), i.clone()], name)],
                    vec![bcreate(&x), create(&a), destroy(&i)],
                    vec![],
                ));
            }
        }
    }
    Expression::new(terms)
}

/// Coupled double-boson excitation `1/2 sum_xyia u_xyai b^+_x b^+_y a^+ i`.
pub fn eps2(
    name: &str,
    bspaces: &[&str],
    ospaces: &[&str],
    vspaces: &[&str],
) -> Result<Expression, WickError> {
    let mut terms = Vec::new();
    for &b1 in bspaces {
        for &b2 in bspaces {
            for &os in ospaces {
                for &vs in vspaces {
                    let x = Idx::boson(0, b1);
                    let y = Idx::boson(next_label(b2, &[b1]), b2);
                    let i = Idx::new(0, os);
                    let a = Idx::new(0, vs);
                    terms.push(Term::new(
                        Scalar::fraction(1, 2),
                        sums(&[&x, &y, &i, &a]),
                        vec![Tensor::with_sym(
                            vec![x.clone(), y.clone(), a.clone(), i.clone()],
                            name,
                            TensorSym::boson_pair(),
                        )?],
                        vec![bcreate(&x), bcreate(&y), create(&a), destroy(&i)],
                        vec![],
                    ));
                }
            }
        }
    }
    Ok(Expression::new(terms))
}

/// Boson excitation with ionization `sum_xi r_xi b^+_x i`.
pub fn ep1ip1(name: &str, bspaces: &[&str], ospaces: &[&str]) -> Expression {
    let mut terms = Vec::new();
    for &bs in bspaces {
        for &os in ospaces {
            let x = Idx::boson(0, bs);
            let i = Idx::new(0, os);
            terms.push(Term::new(
                1,
                sums(&[&x, &i]),
                vec![Tensor::new(vec![x.clone(), i.clone()], name)],
                vec![bcreate(&x), destroy(&i)],
                vec![],
            ));
        }
    }
    Expression::new(terms)
}

/// Boson excitation with attachment `sum_xa r_xa b^+_x a^+`.
pub fn ep1ea1(name: &str, bspaces: &[&str], vspaces: &[&str]) -> Expression {
    let mut terms = Vec::new();
    for &bs in bspaces {
        for &vs in vspaces {
            let x = Idx::boson(0, bs);
            let a = Idx::new(0, vs);
            terms.push(Term::new(
                1,
                sums(&[&x, &a]),
                vec![Tensor::new(vec![x.clone(), a.clone()], name)],
                vec![bcreate(&x), create(&a)],
                vec![],
            ));
        }
    }
    Expression::new(terms)
}

/// `<0| i^+ a`
pub fn bra_e1(ospace: &str, vspace: &str) -> Expression {
    let i = Idx::new(0, ospace);
    let a = Idx::new(0, vspace);
    projector(vec![a.clone(), i.clone()], vec![create(&i), destroy(&a)])
}

/// `<0| i^+ j^+ b a`
pub fn bra_e2(o1: &str, v1: &str, o2: &str, v2: &str) -> Expression {
    let i = Idx::new(0, o1);
    let a = Idx::new(0, v1);
    let j = Idx::new(next_label(o2, &[o1]), o2);
    let b = Idx::new(next_label(v2, &[v1]), v2);
    projector(
        vec![a.clone(), b.clone(), i.clone(), j.clone()],
        vec![create(&i), create(&j), destroy(&b), destroy(&a)],
    )
}

/// `<0| i^+`
pub fn bra_eip1(ospace: &str) -> Expression {
    let i = Idx::new(0, ospace);
    projector(vec![i.clone()], vec![create(&i)])
}

/// `<0| i^+ j^+ a`
pub fn bra_eip2(o1: &str, o2: &str, v1: &str) -> Expression {
    let i = Idx::new(0, o1);
    let a = Idx::new(0, v1);
    let j = Idx::new(next_label(o2, &[o1]), o2);
    projector(
        vec![a.clone(), i.clone(), j.clone()],
        vec![create(&i), create(&j), destroy(&a)],
    )
}

/// `<0| i^+ j^+`
pub fn bra_edip1(o1: &str, o2: &str) -> Expression {
    let i = Idx::new(0, o1);
    let j = Idx::new(next_label(o2, &[o1]), o2);
    projector(vec![i.clone(), j.clone()], vec![create(&i), create(&j)])
}

/// `<0| a`
pub fn bra_eea1(space: &str) -> Expression {
    let a = Idx::new(0, space);
    projector(vec![a.clone()], vec![destroy(&a)])
}

/// `<0| i^+ b a`
pub fn bra_eea2(o1: &str, v1: &str, v2: &str) -> Expression {
    let i = Idx::new(0, o1);
    let a = Idx::new(0, v1);
    let b = Idx::new(next_label(v2, &[v1]), v2);
    projector(
        vec![a.clone(), b.clone(), i.clone()],
        vec![create(&i), destroy(&b), destroy(&a)],
    )
}

/// `<0| b a`
pub fn bra_edea1(v1: &str, v2: &str) -> Expression {
    let a = Idx::new(0, v1);
    let b = Idx::new(next_label(v2, &[v1]), v2);
    projector(vec![a.clone(), b.clone()], vec![destroy(&b), destroy(&a)])
}

/// `<0| b_x`
pub fn bra_p1(space: &str) -> Expression {
    let x = Idx::boson(0, space);
    projector(vec![x.clone()], vec![bdestroy(&x)])
}

/// `<0| b_x b_y`
pub fn bra_p2(space: &str) -> Expression {
    let x = Idx::boson(0, space);
    let y = Idx::boson(1, space);
    projector(vec![x.clone(), y.clone()], vec![bdestroy(&x), bdestroy(&y)])
}

/// `<0| b_x i^+ a`
pub fn bra_p1e1(bspace: &str, ospace: &str, vspace: &str) -> Expression {
    let x = Idx::boson(0, bspace);
    let i = Idx::new(0, ospace);
    let a = Idx::new(0, vspace);
    projector(
        vec![x.clone(), a.clone(), i.clone()],
        vec![bdestroy(&x), create(&i), destroy(&a)],
    )
}

/// `<0| b_x b_y i^+ a`
pub fn bra_p2e1(b1space: &str, b2space: &str, ospace: &str, vspace: &str) -> Expression {
    let x = Idx::boson(0, b1space);
    let y = Idx::boson(next_label(b2space, &[b1space]), b2space);
    let i = Idx::new(0, ospace);
    let a = Idx::new(0, vspace);
    projector(
        vec![x.clone(), y.clone(), a.clone(), i.clone()],
        vec![bdestroy(&x), bdestroy(&y), create(&i), destroy(&a)],
    )
}

/// `<0| b_x a`
pub fn bra_p1eea1(bspace: &str, vspace: &str) -> Expression {
    let x = Idx::boson(0, bspace);
    let a = Idx::new(0, vspace);
    projector(vec![x.clone(), a.clone()], vec![bdestroy(&x), destroy(&a)])
}

/// `<0| b_x i^+`
pub fn bra_p1eip1(bspace: &str, ospace: &str) -> Expression {
    let x = Idx::boson(0, bspace);
    let i = Idx::new(0, ospace);
    projector(vec![x.clone(), i.clone()], vec![bdestroy(&x), create(&i)])
}

/// `a^+ i |0>`
pub fn ket_e1(ospace: &str, vspace: &str) -> Expression {
    let i = Idx::new(0, ospace);
    let a = Idx::new(0, vspace);
    projector(vec![i.clone(), a.clone()], vec![create(&a), destroy(&i)])
}

/// `a^+ b^+ j i |0>`
pub fn ket_e2(o1: &str, v1: &str, o2: &str, v2: &str) -> Expression {
    let i = Idx::new(0, o1);
    let a = Idx::new(0, v1);
    let j = Idx::new(next_label(o2, &[o1]), o2);
    let b = Idx::new(next_label(v2, &[v1]), v2);
    projector(
        vec![i.clone(), j.clone(), a.clone(), b.clone()],
        vec![create(&a), create(&b), destroy(&j), destroy(&i)],
    )
}

/// `a^+ |0>`
pub fn ket_eea1(space: &str) -> Expression {
    let a = Idx::new(0, space);
    projector(vec![a.clone()], vec![create(&a)])
}

/// `a^+ b^+ i |0>`
pub fn ket_eea2(o1: &str, v1: &str, v2: &str) -> Expression {
    let i = Idx::new(0, o1);
    let a = Idx::new(0, v1);
    let b = Idx::new(next_label(v2, &[v1]), v2);
    projector(
        vec![i.clone(), a.clone(), b.clone()],
        vec![create(&a), create(&b), destroy(&i)],
    )
}

/// `i |0>`
pub fn ket_eip1(space: &str) -> Expression {
    let i = Idx::new(0, space);
    projector(vec![i.clone()], vec![destroy(&i)])
}

/// `a^+ j i |0>`
pub fn ket_eip2(o1: &str, o2: &str, v1: &str) -> Expression {
    let i = Idx::new(0, o1);
    let a = Idx::new(0, v1);
    let j = Idx::new(next_label(o2, &[o1]), o2);
    projector(
        vec![i.clone(), j.clone(), a.clone()],
        vec![create(&a), destroy(&j), destroy(&i)],
    )
}

/// `a^+ b^+ |0>`
pub fn ket_edea1(v1: &str, v2: &str) -> Expression {
    let a = Idx::new(0, v1);
    let b = Idx::new(next_label(v2, &[v1]), v2);
    projector(vec![a.clone(), b.clone()], vec![create(&a), create(&b)])
}

/// `j i |0>`
pub fn ket_edip1(o1: &str, o2: &str) -> Expression {
    let i = Idx::new(0, o1);
    let j = Idx::new(next_label(o2, &[o1]), o2);
    projector(vec![i.clone(), j.clone()], vec![destroy(&j), destroy(&i)])
}

/// `b^+_x |0>`
pub fn ket_p1(space: &str) -> Expression {
    let x = Idx::boson(0, space);
    projector(vec![x.clone()], vec![bcreate(&x)])
}

/// `b^+_x b^+_y |0>`
pub fn ket_p2(space: &str) -> Expression {
    let x = Idx::boson(0, space);
    let y = Idx::boson(1, space);
    projector(vec![x.clone(), y.clone()], vec![bcreate(&x), bcreate(&y)])
}

/// `b^+_x a^+ i |0>`
pub fn ket_p1e1(bspace: &str, ospace: &str, vspace: &str) -> Expression {
    let x = Idx::boson(0, bspace);
    let i = Idx::new(0, ospace);
    let a = Idx::new(0, vspace);
    projector(
        vec![x.clone(), i.clone(), a.clone()],
        vec![bcreate(&x), create(&a), destroy(&i)],
    )
}

/// `b^+_x a^+ |0>`
pub fn ket_p1eea1(bspace: &str, vspace: &str) -> Expression {
    let x = Idx::boson(0, bspace);
    let a = Idx::new(0, vspace);
    projector(vec![x.clone(), a.clone()], vec![bcreate(&x), create(&a)])
}

/// `b^+_x i |0>`
pub fn ket_p1eip1(bspace: &str, ospace: &str) -> Expression {
    let x = Idx::boson(0, bspace);
    let i = Idx::new(0, ospace);
    projector(vec![x.clone(), i.clone()], vec![bcreate(&x), destroy(&i)])
}

/// Resolution of the identity on singles, `sum_ia a^+ i |0><0| i^+ a`.
pub fn pe1(ospace: &str, vspace: &str) -> Expression {
    let i = Idx::new(0, ospace);
    let a = Idx::new(0, vspace);
    Expression::from(Term::new(
        1,
        sums(&[&i, &a]),
        vec![],
        vec![
            create(&a),
            destroy(&i),
            Operator::Projector,
            create(&i),
            destroy(&a),
        ],
        vec![],
    ))
}
