use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hash;

/// A single-particle index: an integer label living in a named orbital space.
///
/// Two indices are the same index if both label and space agree, the fermion
/// flag only tells which kind of ladder operator may carry it.
/// Indices order by space name first and label second.
///
/// ```
/// # use wick::index::Idx;
/// let i = Idx::new(0, "occ");
/// let j = Idx::new(1, "occ");
/// let a = Idx::new(0, "vir");
/// assert!(i < j && j < a);
/// assert_eq!("0(occ)", format!("{i}"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idx {
    pub index: usize,
    pub space: String,
    pub fermion: bool,
}

impl Idx {
    pub fn new(index: usize, space: impl Into<String>) -> Self {
        Idx {
            index,
            space: space.into(),
            fermion: true,
        }
    }

    pub fn boson(index: usize, space: impl Into<String>) -> Self {
        Idx {
            index,
            space: space.into(),
            fermion: false,
        }
    }

    /// Same space and statistics, label moved up by `shift`.
    pub fn shifted(&self, shift: usize) -> Self {
        Idx {
            index: self.index + shift,
            space: self.space.clone(),
            fermion: self.fermion,
        }
    }

    pub fn same_space(&self, other: &Idx) -> bool {
        self.space == other.space
    }
}

impl PartialEq for Idx {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.space == other.space
    }
}

impl Eq for Idx {}

impl Hash for Idx {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.space.hash(state);
    }
}

impl PartialOrd for Idx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Idx {
    fn cmp(&self, other: &Self) -> Ordering {
        self.space
            .cmp(&other.space)
            .then(self.index.cmp(&other.index))
    }
}

impl Display for Idx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.index, self.space)
    }
}

/// The occupied/virtual split of the orbital spaces relative to the reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Occupation {
    /// A space is occupied if its name contains an `o`, so `occ`, `o1`... are
    /// occupied while `vir` and `nm` are not.
    #[default]
    Default,
    /// Exactly the listed spaces are occupied.
    Spaces(AHashSet<String>),
}

impl Occupation {
    pub fn spaces<I, S>(spaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Occupation::Spaces(spaces.into_iter().map(Into::into).collect())
    }

    pub fn is_occupied(&self, idx: &Idx) -> bool {
        match self {
            Occupation::Default => idx.space.contains('o'),
            Occupation::Spaces(s) => s.contains(&idx.space),
        }
    }
}
