/*!

Symbolic second quantization with Wick's theorem.

Products of fermionic and bosonic creation and annihilation operators, weighted
by named tensors and summed over indices, are written as [`Term`]s and
[`Expression`]s. [`apply_wick`] replaces every operator string by the sum of
its full contractions with respect to a quasiparticle vacuum (see
[`Occupation`]), leaving Kronecker deltas that [`Expression::resolve`] folds
into the tensors.

What remains is turned into an [`AExpression`] of [`ATerm`]s, where terms that
are equal up to a renaming of summed indices and the declared [`TensorSym`]
permutation symmetries are merged.

```
use wick::{apply_wick, convenience::*, AExpression, Occupation};

let f = one_e("f", &["occ", "vir"], false).unwrap();
let bra = bra_e1("occ", "vir");
let out = apply_wick(&(bra * f), &Occupation::Default).unwrap().resolve();
let result = AExpression::from_expression(&out).unwrap();
assert_eq!(result.len(), 1);
```

Builders for the usual excitation operators, Hamiltonian pieces and projectors
live in [`convenience`], text output in [`render`].

*/

/// Errors
pub mod error;

/// Indices and the occupied/virtual partition
pub mod index;

pub mod permutation;

/// Term coefficients
pub mod scalar;

/// Creation, annihilation and projection operators
pub mod operator;

/// Named tensors, sums and deltas
pub mod tensor;

pub mod term;

pub mod expression;

/// Wick contraction
pub mod contraction;

/// Canonical form of fully contracted expressions
pub mod canonical;

/// Text output
pub mod render;

/// Prebuilt operators and projectors
pub mod convenience;

pub mod utils;

pub use canonical::{AExpression, ATerm, TermMap};
pub use contraction::{apply_wick, get_sign, pair_list, split_operators, valid_contraction};
pub use error::WickError;
pub use expression::{commute, Expression, Operand};
pub use index::{Idx, Occupation};
pub use operator::{is_normal_ordered, normal_ordered, Operator};
pub use permutation::Permutation;
pub use render::{einsum, einsum_lines, IndexKey, Render};
pub use scalar::{Scalar, ZERO_TOLERANCE};
pub use tensor::{Delta, Sigma, Tensor, TensorSym};
pub use term::Term;

#[cfg(test)]
mod tests;
