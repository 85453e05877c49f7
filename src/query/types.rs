use bson::Bson;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Safety limits to prevent resource abuse
pub(crate) const MAX_PATH_DEPTH: usize = 32;
pub(crate) const MAX_SORT_FIELDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

/// Predicate over a stored document. Paths are dotted and fan out through
/// arrays of sub-documents, so `grades.grade` matches when any grade record
/// carries a matching value.
#[derive(Debug, Clone)]
pub enum Filter {
    True,
    And(Vec<Filter>),
    Eq { path: String, value: Bson },
    In { path: String, values: Vec<Bson> },
    Regex { path: String, regex: Regex },
}

impl Filter {
    /// Conjunction that collapses the trivial cases.
    #[must_use]
    pub fn and(mut filters: Vec<Filter>) -> Self {
        match filters.len() {
            0 => Self::True,
            1 => filters.remove(0),
            _ => Self::And(filters),
        }
    }

    /// `path` equals one of `values` (string values only).
    #[must_use]
    pub fn one_of<I, T>(path: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::In {
            path: path.to_string(),
            values: values.into_iter().map(|v| Bson::String(v.into())).collect(),
        }
    }
}

/// One step of an aggregation over the collection. Stages run in order.
#[derive(Debug, Clone)]
pub enum Stage {
    Match(Filter),
    /// Sets `field` to the mean of the numbers found at `source` (0 if none).
    AddAverage { field: String, source: String },
    Sort(Vec<SortSpec>),
    Skip(usize),
    Limit(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }
}
