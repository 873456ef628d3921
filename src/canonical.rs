//! Contracted terms in canonical form.
//!
//! An [`ATerm`] is what remains of a [`Term`](crate::term::Term) once all
//! operators are contracted: a scalar, sums and tensors. Terms are compared
//! through their [`TermMap`], which forgets index labels, and merged in an
//! [`AExpression`] when they agree up to the declared tensor symmetries.

mod aexpression;
mod aterm;
mod term_map;

pub use aexpression::AExpression;
pub use aterm::{ATerm, MAX_FLOOD_ITERATIONS};
pub use term_map::{Leg, LegMap, TermMap};
