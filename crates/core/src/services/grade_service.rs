use crate::errors::CoreError;
use crate::models::grade::{GradeSelection, PriorAggregate};
use crate::models::report::{Band, GradeReport};

/// Converts a GPA on the 10-point scale to a percentage: `(gpa - 0.5) * 10`.
pub fn gpa_to_percentage(gpa: f64) -> f64 {
    (gpa - 0.5) * 10.0
}

/// Computes SGPA, CGPA, percentage and band from grade selections.
///
/// Stateless; callers pass every input by value or reference.
pub struct GradeService;

impl GradeService {
    pub fn new() -> Self {
        Self
    }

    /// Compute a report for one semester, optionally folded into a prior aggregate.
    ///
    /// Fails with:
    /// - `IncompleteSelection` listing the positions without a grade
    /// - `ValidationError` when a row's credits are negative or not finite
    /// - `ZeroCredits` when the semester carries no credit weight (including no rows)
    /// - `InvalidPriorData` when `prior` is out of range
    pub fn compute(
        &self,
        selections: &[GradeSelection],
        prior: Option<&PriorAggregate>,
    ) -> Result<GradeReport, CoreError> {
        // 1. Every row needs a grade
        let missing: Vec<usize> = selections
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_complete())
            .map(|(i, _)| i)
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::IncompleteSelection(missing));
        }

        if let Some((i, bad)) = selections
            .iter()
            .enumerate()
            .find(|(_, s)| !s.credits.is_finite() || s.credits < 0.0)
        {
            return Err(CoreError::ValidationError(format!(
                "subject #{i}: credits must be a non-negative number, got {}",
                bad.credits
            )));
        }

        // 2. Weighted totals for this semester
        let (semester_credits, semester_points) = selections
            .iter()
            .filter_map(|s| s.grade.map(|g| (s.credits, s.credits * f64::from(g.points()))))
            .fold((0.0, 0.0), |(credits, points), (c, p)| (credits + c, points + p));

        if semester_credits == 0.0 {
            return Err(CoreError::ZeroCredits);
        }

        let sgpa = semester_points / semester_credits;

        // 3. Fold in earlier semesters
        let (cgpa, credits) = match prior {
            None => (None, semester_credits),
            Some(prior) => {
                prior.validate()?;
                let overall_credits = prior.credits + semester_credits;
                if overall_credits <= 0.0 || !overall_credits.is_finite() {
                    return Err(CoreError::ZeroCredits);
                }
                let cgpa = (prior.points() + semester_points) / overall_credits;
                (Some(cgpa), overall_credits)
            }
        };

        // 4. Percentage and band follow the active score
        let active = cgpa.unwrap_or(sgpa);

        Ok(GradeReport {
            sgpa,
            cgpa,
            semester_credits,
            semester_points,
            credits,
            percentage: gpa_to_percentage(active),
            band: Band::from_score(active),
        })
    }
}

impl Default for GradeService {
    fn default() -> Self {
        Self::new()
    }
}
