use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Qualitative label for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Outstanding,
    Excellent,
    VeryGood,
    Good,
    Average,
    Reappear,
}

impl Band {
    /// Lower bounds, highest first. Each bound is inclusive.
    pub const THRESHOLDS: [(f64, Band); 5] = [
        (9.0, Band::Outstanding),
        (8.0, Band::Excellent),
        (7.0, Band::VeryGood),
        (6.0, Band::Good),
        (5.0, Band::Average),
    ];

    /// Classify a score. Anything below 5.0 (or NaN) is `Reappear`.
    pub fn from_score(score: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(bound, _)| score >= *bound)
            .map(|(_, band)| *band)
            .unwrap_or(Band::Reappear)
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Outstanding => "Outstanding",
            Band::Excellent => "Excellent",
            Band::VeryGood => "Very Good",
            Band::Good => "Good",
            Band::Average => "Average",
            Band::Reappear => "Reappear",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one grade computation.
///
/// Numbers keep full precision; the `*_display` helpers produce the
/// two-decimal strings shown on screen and written to history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Semester GPA
    pub sgpa: f64,

    /// Cumulative GPA, only when a prior aggregate was supplied
    pub cgpa: Option<f64>,

    /// Credits of the current semester
    pub semester_credits: f64,

    /// Credit-weighted grade points of the current semester
    pub semester_points: f64,

    /// Overall credits: prior + semester in cumulative mode, else semester
    pub credits: f64,

    /// `(active_score - 0.5) * 10`, unclamped
    pub percentage: f64,

    /// Band of the active score
    pub band: Band,
}

impl GradeReport {
    /// CGPA when cumulative, otherwise SGPA.
    pub fn active_score(&self) -> f64 {
        self.cgpa.unwrap_or(self.sgpa)
    }

    pub fn is_cumulative(&self) -> bool {
        self.cgpa.is_some()
    }

    pub fn sgpa_display(&self) -> String {
        format_fixed2(self.sgpa)
    }

    pub fn cgpa_display(&self) -> Option<String> {
        self.cgpa.map(format_fixed2)
    }

    pub fn percentage_display(&self) -> String {
        format!("{}%", format_fixed2(self.percentage))
    }

    pub fn credits_display(&self) -> String {
        format_credits(self.credits)
    }
}

/// Two decimals, with exact halves rounded away from zero (8.125 -> "8.13").
pub fn format_fixed2(value: f64) -> String {
    if value == 0.0 {
        return "0.00".to_string();
    }
    if value.is_finite() {
        let halves = (value * 200.0).round();
        let exact_half = value.mul_add(200.0, -halves) == 0.0 && halves % 2.0 != 0.0;
        if exact_half {
            let hundredths = (halves + halves.signum()) / 2.0;
            return format!("{:.2}", hundredths / 100.0);
        }
    }
    format!("{value:.2}")
}

/// Whole numbers print without a fractional part ("23", not "23.0").
pub fn format_credits(credits: f64) -> String {
    if credits.fract() == 0.0 && credits.abs() < 1e15 {
        format!("{}", credits as i64)
    } else {
        format!("{credits}")
    }
}

/// Header block of a printed result sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintHeader {
    pub name: String,
    pub roll: String,
    pub date: String,
}

impl PrintHeader {
    pub const DEFAULT_NAME: &'static str = "Student";
    pub const DEFAULT_ROLL: &'static str = "N/A";

    /// Blank name or roll number fall back to the defaults.
    pub fn new(name: &str, roll: &str, printed_at: DateTime<Local>) -> Self {
        let or_default = |value: &str, default: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        };
        Self {
            name: or_default(name, Self::DEFAULT_NAME),
            roll: or_default(roll, Self::DEFAULT_ROLL),
            date: printed_at.format("%d/%m/%Y").to_string(),
        }
    }

    /// File name (without extension) for the saved sheet: `<name>_<roll>_Result`.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}_Result",
            sanitize_file_part(&self.name),
            sanitize_file_part(&self.roll)
        )
    }
}

fn sanitize_file_part(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
