use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::WickError;
use crate::index::Idx;
use crate::permutation::Permutation;

/// Permutational symmetry of a tensor: the permutations of its legs under
/// which its value is unchanged up to the attached sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorSym {
    pub tlist: Vec<(Permutation, i8)>,
}

impl TensorSym {
    pub fn identity(n: usize) -> Self {
        TensorSym {
            tlist: vec![(Permutation::id(n), 1)],
        }
    }

    /// Checks every map is a permutation of `0..arity`.
    pub fn new(arity: usize, tlist: Vec<(Vec<usize>, i8)>) -> Result<Self, WickError> {
        let tlist = tlist
            .into_iter()
            .map(|(map, sign)| {
                if map.len() != arity {
                    return Err(WickError::InvalidSymmetry(map, arity));
                }
                Permutation::from_map(map.clone())
                    .map(|p| (p, sign))
                    .map_err(|_| WickError::InvalidSymmetry(map, arity))
            })
            .collect::<Result<_, _>>()?;
        Ok(TensorSym { tlist })
    }

    fn known(tlist: &[(&[usize], i8)]) -> Self {
        TensorSym {
            tlist: tlist
                .iter()
                .map(|(m, s)| (Permutation::from_valid_map(m.to_vec()), *s))
                .collect(),
        }
    }

    /// `v_{pqrs} = -v_{qprs} = -v_{pqsr} = v_{qpsr}`
    pub fn antisymmetric_two_body() -> Self {
        Self::known(&[
            (&[0, 1, 2, 3], 1),
            (&[1, 0, 2, 3], -1),
            (&[0, 1, 3, 2], -1),
            (&[1, 0, 3, 2], 1),
        ])
    }

    /// `v_{pqrs} = v_{qpsr}`
    pub fn symmetric_two_body() -> Self {
        Self::known(&[(&[0, 1, 2, 3], 1), (&[1, 0, 3, 2], 1)])
    }

    pub fn two_body(anti: bool) -> Self {
        if anti {
            Self::antisymmetric_two_body()
        } else {
            Self::symmetric_two_body()
        }
    }

    /// Antisymmetric in the two occupied legs of an ionized trion `r_{aij}`.
    pub fn ip2() -> Self {
        Self::known(&[(&[0, 1, 2], 1), (&[0, 2, 1], -1)])
    }

    /// Antisymmetric in the two virtual legs of an attached trion `r_{abi}`.
    pub fn ea2() -> Self {
        Self::known(&[(&[0, 1, 2], 1), (&[1, 0, 2], -1)])
    }

    pub fn symmetric_pair() -> Self {
        Self::known(&[(&[0, 1], 1), (&[1, 0], 1)])
    }

    /// Symmetric in the two leading boson legs of a four-leg tensor.
    pub fn boson_pair() -> Self {
        Self::known(&[(&[0, 1, 2, 3], 1), (&[1, 0, 2, 3], 1)])
    }
}

/// A named tensor. The empty name marks the placeholder carrying free indices.
///
/// Equality and hashing look at name and indices only, the symmetry is
/// metadata. Tensors order by arity, then name, then indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    pub indices: Vec<Idx>,
    pub name: String,
    pub sym: TensorSym,
}

impl Tensor {
    pub fn new(indices: Vec<Idx>, name: impl Into<String>) -> Self {
        let sym = TensorSym::identity(indices.len());
        Tensor {
            indices,
            name: name.into(),
            sym,
        }
    }

    pub fn with_sym(
        indices: Vec<Idx>,
        name: impl Into<String>,
        sym: TensorSym,
    ) -> Result<Self, WickError> {
        for (p, _) in &sym.tlist {
            if p.len() != indices.len() {
                return Err(WickError::InvalidSymmetry(p.map().to_vec(), indices.len()));
            }
        }
        Ok(Tensor {
            indices,
            name: name.into(),
            sym,
        })
    }

    pub fn external(indices: Vec<Idx>) -> Self {
        Tensor::new(indices, "")
    }

    pub fn is_external(&self) -> bool {
        self.name.is_empty()
    }

    /// Distinct indices in order of first appearance.
    pub fn ilist(&self) -> Vec<Idx> {
        let mut out: Vec<Idx> = Vec::with_capacity(self.indices.len());
        for i in &self.indices {
            if !out.contains(i) {
                out.push(i.clone());
            }
        }
        out
    }

    /// Copy with the legs reordered by `perm`, keeping the symmetry.
    pub fn permuted(&self, perm: &Permutation) -> Self {
        Tensor {
            indices: perm.apply_slice(&self.indices),
            name: self.name.clone(),
            sym: self.sym.clone(),
        }
    }

    pub fn transpose(&mut self, perm: &[usize]) -> Result<(), WickError> {
        if perm.len() != self.indices.len() {
            return Err(WickError::WrongNumberOfArguments(
                perm.len(),
                self.indices.len(),
            ));
        }
        let perm = Permutation::from_map(perm.to_vec())?;
        self.indices = perm.apply_slice(&self.indices);
        Ok(())
    }

    pub(crate) fn shifted(&self, shift: usize) -> Self {
        Tensor {
            indices: self.indices.iter().map(|i| i.shifted(shift)).collect(),
            name: self.name.clone(),
            sym: self.sym.clone(),
        }
    }

    pub(crate) fn substitute(&mut self, from: &Idx, to: &Idx) {
        for i in self.indices.iter_mut().filter(|i| *i == from) {
            *i = to.clone();
        }
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.indices == other.indices
    }
}

impl Eq for Tensor {}

impl Hash for Tensor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.indices.hash(state);
    }
}

impl PartialOrd for Tensor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tensor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.indices
            .len()
            .cmp(&other.indices.len())
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.indices.cmp(&other.indices))
    }
}

impl Display for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{{", self.name)?;
        for i in &self.indices {
            write!(f, "{i}")?;
        }
        write!(f, "}}")
    }
}

/// A summation over one index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sigma(pub Idx);

impl Sigma {
    pub fn idx(&self) -> &Idx {
        &self.0
    }
}

impl Display for Sigma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\\sum_{{{}}}", self.0)
    }
}

/// A Kronecker delta between two indices of the same space. Unordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delta {
    pub i1: Idx,
    pub i2: Idx,
}

impl Delta {
    pub fn new(i1: Idx, i2: Idx) -> Result<Self, WickError> {
        if !i1.same_space(&i2) {
            return Err(WickError::SpaceMismatch(i1.space, i2.space));
        }
        Ok(Delta { i1, i2 })
    }

    pub fn is_trivial(&self) -> bool {
        self.i1 == self.i2
    }

    fn sorted(&self) -> (&Idx, &Idx) {
        if self.i1 <= self.i2 {
            (&self.i1, &self.i2)
        } else {
            (&self.i2, &self.i1)
        }
    }

    pub(crate) fn shifted(&self, shift: usize) -> Self {
        Delta {
            i1: self.i1.shifted(shift),
            i2: self.i2.shifted(shift),
        }
    }

    pub(crate) fn substitute(&mut self, from: &Idx, to: &Idx) {
        if &self.i1 == from {
            self.i1 = to.clone();
        }
        if &self.i2 == from {
            self.i2 = to.clone();
        }
    }

    /// The delta as a symmetric two-leg tensor named `delta`.
    pub fn to_tensor(&self) -> Tensor {
        Tensor {
            indices: vec![self.i1.clone(), self.i2.clone()],
            name: "delta".into(),
            sym: TensorSym::symmetric_pair(),
        }
    }
}

impl PartialEq for Delta {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for Delta {}

impl Hash for Delta {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl Display for Delta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\\delta_{{{},{}}}", self.i1, self.i2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    #[test]
    fn tensor_equality_ignores_symmetry() {
        let i = Idx::new(0, "occ");
        let j = Idx::new(1, "occ");
        let a = Idx::new(0, "vir");
        let b = Idx::new(1, "vir");
        let idx = vec![i, j, a, b];
        let t1 = Tensor::new(idx.clone(), "v");
        let t2 = Tensor::with_sym(idx, "v", TensorSym::antisymmetric_two_body()).unwrap();
        assert_eq!(t1, t2);

        let set: AHashSet<Tensor> = [t1, t2].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn symmetry_validation() {
        let i = Idx::new(0, "occ");
        assert_eq!(
            Tensor::with_sym(vec![i.clone()], "f", TensorSym::symmetric_pair()),
            Err(WickError::InvalidSymmetry(vec![0, 1], 1))
        );
        assert_eq!(
            TensorSym::new(2, vec![(vec![0, 0], 1)]),
            Err(WickError::InvalidSymmetry(vec![0, 0], 2))
        );
        assert!(TensorSym::new(3, vec![(vec![0, 1], 1)]).is_err());
        assert_eq!(
            TensorSym::new(2, vec![(vec![0, 1], 1), (vec![1, 0], 1)]).unwrap(),
            TensorSym::symmetric_pair()
        );
    }

    #[test]
    fn ordering() {
        let i = Idx::new(0, "occ");
        let j = Idx::new(1, "occ");
        let f = Tensor::new(vec![i.clone()], "f");
        let g = Tensor::new(vec![i.clone(), j.clone()], "a");
        let h = Tensor::new(vec![i.clone(), j.clone()], "b");
        let h2 = Tensor::new(vec![j, i], "b");
        assert!(f < g);
        assert!(g < h);
        assert!(h < h2);
    }

    #[test]
    fn transpose_and_ilist() {
        let i = Idx::new(0, "occ");
        let a = Idx::new(0, "vir");
        let mut t = Tensor::external(vec![i.clone(), a.clone(), i.clone()]);
        assert_eq!(t.ilist(), vec![i.clone(), a.clone()]);
        t.transpose(&[1, 0, 2]).unwrap();
        assert_eq!(t.indices, vec![a, i.clone(), i]);
        assert!(t.transpose(&[0, 1]).is_err());
        assert!(t.transpose(&[0, 0, 1]).is_err());
    }

    #[test]
    fn delta() {
        let i = Idx::new(0, "occ");
        let j = Idx::new(1, "occ");
        let a = Idx::new(0, "vir");
        assert_eq!(
            Delta::new(i.clone(), a),
            Err(WickError::SpaceMismatch("occ".into(), "vir".into()))
        );
        let d1 = Delta::new(i.clone(), j.clone()).unwrap();
        let d2 = Delta::new(j, i.clone()).unwrap();
        assert_eq!(d1, d2);
        let set: AHashSet<Delta> = [d1.clone(), d2].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(Delta::new(i.clone(), i).unwrap().is_trivial());
        assert_eq!(d1.to_tensor().name, "delta");
        assert_eq!(d1.to_string(), "\\delta_{0(occ),1(occ)}");
    }
}
