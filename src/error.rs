use thiserror::Error;

use crate::index::Idx;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WickError {
    #[error("delta or contraction across spaces {0} and {1}")]
    SpaceMismatch(String, String),
    #[error("application of Wick's theorem has failed: {0} terms still carry operators")]
    OperatorsRemain(usize),
    #[error("operator segment of odd length {0} reached pairing")]
    OddSegment(usize),
    #[error("cannot build an abstract term from a term with {0} operators")]
    UnresolvedOperators(usize),
    #[error("permutation {0:?} is not a valid permutation of {1} legs")]
    InvalidSymmetry(Vec<usize>, usize),
    #[error("{0:?} is not a permutation")]
    InvalidPermutation(Vec<usize>),
    #[error("wrong number of arguments {0}, expected {1}")]
    WrongNumberOfArguments(usize, usize),
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    #[error("cannot merge external indices in unsorted term")]
    UnsortedExternal,
    #[error("term has no external tensor to transpose")]
    NoExternalTensor,
    #[error("connectivity search exceeded {0} iterations")]
    ConnectivityLimit(usize),
    #[error("fraction {0}/0 has a zero denominator")]
    ZeroDenominator(i64),
    #[error("no label left for index {0}")]
    MissingLabel(Idx),
}
