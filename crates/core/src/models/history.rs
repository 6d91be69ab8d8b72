use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

use super::report::{format_credits, GradeReport};

/// Display format of [`HistoryEntry::date`].
pub const HISTORY_DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// A saved result. Immutable once stored.
///
/// The numeric fields are kept as the strings that were on screen when the
/// result was saved, matching the stored record layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation time in milliseconds since the Unix epoch; unique within a log
    pub id: i64,

    /// Human-readable creation time
    pub date: String,

    /// SGPA, two decimals
    pub sgpa: String,

    /// CGPA, two decimals; `None` unless the result was cumulative
    #[serde(default)]
    pub cgpa: Option<String>,

    /// Percentage with a trailing `%`
    pub percentage: String,

    /// Overall credits. Older records stored this as text.
    #[serde(deserialize_with = "credits_from_number_or_text")]
    pub credits: f64,
}

impl HistoryEntry {
    /// Snapshot `report` with the given id and timestamp.
    pub fn from_report(report: &GradeReport, id: i64, saved_at: DateTime<Local>) -> Self {
        Self {
            id,
            date: saved_at.format(HISTORY_DATE_FORMAT).to_string(),
            sgpa: report.sgpa_display(),
            cgpa: report.cgpa_display(),
            percentage: report.percentage_display(),
            credits: report.credits,
        }
    }

    /// "CGPA: 8.33" for cumulative results, "SGPA: 8.50" otherwise.
    pub fn headline(&self) -> String {
        match &self.cgpa {
            Some(cgpa) => format!("CGPA: {cgpa}"),
            None => format!("SGPA: {}", self.sgpa),
        }
    }

    pub fn credits_display(&self) -> String {
        format_credits(self.credits)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CreditsRepr {
    Number(f64),
    Text(String),
}

fn credits_from_number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match CreditsRepr::deserialize(deserializer)? {
        CreditsRepr::Number(n) => Ok(n),
        CreditsRepr::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("credits '{s}' is not a number"))),
    }
}
