use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::WickError;
use crate::index::{Idx, Occupation};

/// A second-quantized operator.
///
/// Ladder operators carry one index and a creation flag. [`Operator::Projector`]
/// is an index-less boundary: it is never contracted and it splits an operator
/// string into segments that are contracted independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Fermion { idx: Idx, creation: bool },
    Boson { idx: Idx, creation: bool },
    Projector,
}

impl Operator {
    pub fn fermion(idx: Idx, creation: bool) -> Self {
        Operator::Fermion { idx, creation }
    }

    pub fn boson(idx: Idx, creation: bool) -> Self {
        Operator::Boson { idx, creation }
    }

    pub fn idx(&self) -> Option<&Idx> {
        match self {
            Operator::Fermion { idx, .. } | Operator::Boson { idx, .. } => Some(idx),
            Operator::Projector => None,
        }
    }

    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            Operator::Fermion { creation: true, .. } | Operator::Boson { creation: true, .. }
        )
    }

    pub fn is_fermion(&self) -> bool {
        matches!(self, Operator::Fermion { .. })
    }

    pub fn is_boson(&self) -> bool {
        matches!(self, Operator::Boson { .. })
    }

    pub fn is_projector(&self) -> bool {
        matches!(self, Operator::Projector)
    }

    /// Hermitian adjoint. The projector is its own adjoint.
    pub fn dagger(&self) -> Self {
        match self {
            Operator::Fermion { idx, creation } => Operator::Fermion {
                idx: idx.clone(),
                creation: !creation,
            },
            Operator::Boson { idx, creation } => Operator::Boson {
                idx: idx.clone(),
                creation: !creation,
            },
            Operator::Projector => Operator::Projector,
        }
    }

    /// Whether the operator creates a quasiparticle relative to the reference:
    /// fermion creation on an unoccupied index, fermion annihilation on an
    /// occupied one, boson creation.
    pub fn qp_creation(&self, occ: &Occupation) -> bool {
        match self {
            Operator::Fermion { idx, creation } => occ.is_occupied(idx) != *creation,
            Operator::Boson { creation, .. } => *creation,
            Operator::Projector => false,
        }
    }

    pub fn qp_annihilation(&self, occ: &Occupation) -> bool {
        match self {
            Operator::Projector => false,
            _ => !self.qp_creation(occ),
        }
    }

    pub(crate) fn shifted(&self, shift: usize) -> Self {
        self.map_idx(|i| i.shifted(shift))
    }

    pub(crate) fn substitute(&self, from: &Idx, to: &Idx) -> Self {
        self.map_idx(|i| if i == from { to.clone() } else { i.clone() })
    }

    fn map_idx(&self, f: impl Fn(&Idx) -> Idx) -> Self {
        match self {
            Operator::Fermion { idx, creation } => Operator::Fermion {
                idx: f(idx),
                creation: *creation,
            },
            Operator::Boson { idx, creation } => Operator::Boson {
                idx: f(idx),
                creation: *creation,
            },
            Operator::Projector => Operator::Projector,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Fermion { idx, creation: true } => write!(f, "a^{{\\dagger}}_{idx}"),
            Operator::Fermion { idx, creation: false } => write!(f, "a_{idx}"),
            Operator::Boson { idx, creation: true } => write!(f, "b^{{\\dagger}}_{idx}"),
            Operator::Boson { idx, creation: false } => write!(f, "b_{idx}"),
            Operator::Projector => write!(f, "P"),
        }
    }
}

pub fn is_normal_ordered(ops: &[Operator], occ: &Occupation) -> bool {
    first_out_of_order(ops, occ).is_none()
}

/// First quasiparticle-annihilation position and the first quasiparticle
/// creator standing to its right.
fn first_out_of_order(ops: &[Operator], occ: &Occupation) -> Option<(usize, usize)> {
    let first_annihilator = ops.iter().position(|o| !o.qp_creation(occ))?;
    ops[first_annihilator..]
        .iter()
        .position(|o| o.qp_creation(occ))
        .map(|k| (first_annihilator, first_annihilator + k))
}

/// Moves quasiparticle creators left of quasiparticle annihilators.
///
/// Returns the reordered string with the sign picked up by moving fermionic
/// operators past each other. Projectors cannot be reordered.
pub fn normal_ordered(
    ops: &[Operator],
    occ: &Occupation,
) -> Result<(Vec<Operator>, i8), WickError> {
    if ops.iter().any(Operator::is_projector) {
        return Err(WickError::UnsupportedConfiguration(
            "normal ordering across a projector".into(),
        ));
    }
    let mut ops = ops.to_vec();
    let mut sign = 1;
    while let Some((first, swap)) = first_out_of_order(&ops, occ) {
        let moved = ops.remove(swap);
        if moved.is_fermion() {
            let passed = ops[first..swap].iter().filter(|o| o.is_fermion()).count();
            if passed % 2 == 1 {
                sign = -sign;
            }
        }
        ops.insert(first, moved);
    }
    Ok((ops, sign))
}
