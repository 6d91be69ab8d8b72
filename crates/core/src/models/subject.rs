use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default curriculum (Regulation 2021), in display order.
pub const DEFAULT_SUBJECTS: &[(&str, f64)] = &[
    ("Discrete Mathematics", 4.0),
    ("Data Structures & Algorithms", 3.0),
    ("Database Management Systems", 3.0),
    ("Object-Oriented Programming", 3.0),
    ("Software Engineering", 3.0),
    ("Operating Systems", 3.0),
    ("DSA Laboratory", 2.0),
    ("DBMS Laboratory", 2.0),
    ("OS Laboratory", 2.0),
];

/// Ids of the default subjects are fixed so that two resets produce
/// identical catalogs. Default subject `i` gets `DEFAULT_ID_BASE + i`.
const DEFAULT_ID_BASE: u128 = 0x5347_5041_0000_4000_8000_0000_0000_0000;

/// A single course in the catalog.
///
/// Position in the catalog drives display and weighting order. The `id` is
/// stable across edits and deletes of other rows; records written before ids
/// existed get a fresh one when they are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Stable identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Display name (never empty)
    pub name: String,

    /// Credit weight (always positive)
    pub credits: f64,
}

impl Subject {
    pub fn new(name: impl Into<String>, credits: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            credits,
        }
    }

    /// Same name and credits, ignoring the id.
    pub fn same_content(&self, other: &Subject) -> bool {
        self.name == other.name && self.credits == other.credits
    }
}

/// Ordered list of subjects. Insertion order is significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
}

impl Catalog {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    /// The embedded default list. Every call returns an equal catalog.
    pub fn defaults() -> Self {
        Self {
            subjects: DEFAULT_SUBJECTS
                .iter()
                .enumerate()
                .map(|(i, (name, credits))| Subject {
                    id: Uuid::from_u128(DEFAULT_ID_BASE + i as u128),
                    name: (*name).to_string(),
                    credits: *credits,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Subject> {
        self.subjects.get(index)
    }

    /// Current position of the subject with `id`, if it is still in the catalog.
    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.subjects.iter().position(|s| s.id == id)
    }

    /// Sum of all credit weights.
    pub fn total_credits(&self) -> f64 {
        self.subjects.iter().map(|s| s.credits).sum()
    }

    /// Compare names and credits in order, ignoring ids.
    pub fn same_content(&self, other: &Catalog) -> bool {
        self.subjects.len() == other.subjects.len()
            && self
                .subjects
                .iter()
                .zip(&other.subjects)
                .all(|(a, b)| a.same_content(b))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.subjects.iter().any(|s| s.name == name)
    }
}
