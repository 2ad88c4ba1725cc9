use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validator;

/// A single column/row or a group of them modified jointly as one combination.
///
/// Deserializes from either a bare integer or a list of integers, so YAML
/// such as `[[0, 2], 1]` reads naturally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    Single(usize),
    Group(Vec<usize>),
}

impl IndexSpec {
    /// Indices addressed by this spec, in the order given
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        match self {
            IndexSpec::Single(idx) => std::slice::from_ref(idx),
            IndexSpec::Group(group) => group,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, IndexSpec::Group(_))
    }
}

impl From<usize> for IndexSpec {
    fn from(idx: usize) -> Self {
        IndexSpec::Single(idx)
    }
}

impl From<Vec<usize>> for IndexSpec {
    fn from(group: Vec<usize>) -> Self {
        IndexSpec::Group(group)
    }
}

/// Which elements a modification or removal targets.
///
/// `All` means every index of the addressed axis, independently and one at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Indexes {
    #[default]
    All,
    List(Vec<IndexSpec>),
}

impl Indexes {
    /// Expand to concrete specs for an axis of `size` elements, validating bounds.
    pub fn resolve(&self, name: &'static str, size: usize) -> Result<Vec<IndexSpec>> {
        match self {
            Indexes::All => Ok((0..size).map(IndexSpec::Single).collect()),
            Indexes::List(specs) => {
                validator::check_indexes(name, specs, size)?;
                Ok(specs.clone())
            }
        }
    }
}

impl From<usize> for Indexes {
    fn from(idx: usize) -> Self {
        Indexes::List(vec![IndexSpec::Single(idx)])
    }
}

/// Each element becomes its own single-index spec
impl From<Vec<usize>> for Indexes {
    fn from(indices: Vec<usize>) -> Self {
        Indexes::List(indices.into_iter().map(IndexSpec::Single).collect())
    }
}

impl From<Vec<IndexSpec>> for Indexes {
    fn from(specs: Vec<IndexSpec>) -> Self {
        Indexes::List(specs)
    }
}
