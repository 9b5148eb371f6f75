//! Input checks shared by the workout commands.

use crate::db::models::NewLoggedExercise;
use crate::errors::{LiftlogError, Result};

/// Largest accepted `sets`/`reps` value; counts are stored as 32-bit integers.
pub(crate) const MAX_COUNT: i64 = i32::MAX as i64;

/// Trims `raw`; an empty result is a validation failure.
pub(crate) fn workout_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LiftlogError::validation("name is required"));
    }
    Ok(name.to_string())
}

fn count(idx: usize, field: &str, value: i64) -> Result<()> {
    if value <= 0 || value > MAX_COUNT {
        return Err(LiftlogError::validation(format!(
            "exercises[{idx}].{field} must be a positive integer no greater than {MAX_COUNT}"
        )));
    }
    Ok(())
}

pub(crate) fn line_items(items: &[NewLoggedExercise]) -> Result<()> {
    for (idx, item) in items.iter().enumerate() {
        if item.exercise_template_id.trim().is_empty() {
            return Err(LiftlogError::validation(format!(
                "exercises[{idx}].exerciseTemplateId is required"
            )));
        }
        count(idx, "sets", item.sets)?;
        count(idx, "reps", item.reps)?;
        if let Some(weight) = item.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(LiftlogError::validation(format!(
                    "exercises[{idx}].weight must be a non-negative number"
                )));
            }
        }
    }
    Ok(())
}

/// Folds `-0.0` into `0.0` so a zero weight always reads back unsigned.
pub(crate) fn normalize_weight(weight: Option<f64>) -> Option<f64> {
    weight.map(|w| if w == 0.0 { 0.0 } else { w })
}
