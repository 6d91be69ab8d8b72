use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::subject::Catalog;
use crate::errors::CoreError;

/// Highest CGPA on the 10-point scale.
pub const MAX_GRADE_POINT: f64 = 10.0;

/// Letter grade on the fixed 10-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// Outstanding (10)
    O,
    /// 9
    #[serde(rename = "A+")]
    APlus,
    /// 8
    A,
    /// 7
    #[serde(rename = "B+")]
    BPlus,
    /// 6
    B,
    /// 5
    C,
    /// Fail / reappear (0)
    U,
}

impl Grade {
    /// Every grade, highest first (the order of a grade picker).
    pub const ALL: [Grade; 7] = [
        Grade::O,
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::U,
    ];

    pub fn points(self) -> u8 {
        match self {
            Grade::O => 10,
            Grade::APlus => 9,
            Grade::A => 8,
            Grade::BPlus => 7,
            Grade::B => 6,
            Grade::C => 5,
            Grade::U => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::O => "O",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::U => "U",
        }
    }

    /// Inverse of [`Grade::points`]. Values off the scale (e.g. 1-4) have no grade.
    pub fn from_points(points: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.points() == points)
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = CoreError;

    /// Accepts a label ("A+", case-insensitive) or a point value ("9").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(grade) = Self::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(trimmed))
        {
            return Ok(grade);
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Self::from_points)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown grade '{s}'")))
    }
}

/// One subject's credit weight paired with the grade picked for it.
///
/// `grade == None` means nothing has been picked yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeSelection {
    pub credits: f64,
    pub grade: Option<Grade>,
}

impl GradeSelection {
    pub fn new(credits: f64, grade: Grade) -> Self {
        Self {
            credits,
            grade: Some(grade),
        }
    }

    pub fn unselected(credits: f64) -> Self {
        Self {
            credits,
            grade: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.grade.is_some()
    }

    /// One unselected row per catalog subject, in catalog order.
    pub fn blank_form(catalog: &Catalog) -> Vec<Self> {
        catalog
            .subjects
            .iter()
            .map(|s| Self::unselected(s.credits))
            .collect()
    }
}

/// Summary of every semester before the current one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorAggregate {
    /// Credits earned so far (non-negative)
    pub credits: f64,

    /// CGPA over those credits, within 0..=10
    pub cgpa: f64,
}

impl PriorAggregate {
    pub fn new(credits: f64, cgpa: f64) -> Result<Self, CoreError> {
        let prior = Self { credits, cgpa };
        prior.validate()?;
        Ok(prior)
    }

    /// Build from raw form text. Both fields are required.
    pub fn parse(credits: &str, cgpa: &str) -> Result<Self, CoreError> {
        let credits = parse_field("credits", credits)?;
        let cgpa = parse_field("CGPA", cgpa)?;
        Self::new(credits, cgpa)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.credits.is_finite() || self.credits < 0.0 {
            return Err(CoreError::InvalidPriorData(format!(
                "credits must be a non-negative number, got {}",
                self.credits
            )));
        }
        if !self.cgpa.is_finite() || !(0.0..=MAX_GRADE_POINT).contains(&self.cgpa) {
            return Err(CoreError::InvalidPriorData(format!(
                "CGPA must be between 0 and {MAX_GRADE_POINT}, got {}",
                self.cgpa
            )));
        }
        Ok(())
    }

    /// Credit-weighted grade points accumulated so far.
    pub fn points(&self) -> f64 {
        self.cgpa * self.credits
    }
}

fn parse_field(field: &str, raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidPriorData(format!("{field} is required")));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidPriorData(format!("{field} '{trimmed}' is not a number")))
}
