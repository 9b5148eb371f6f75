use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::db::models::{MuscleGroup, Workout};
use crate::errors::Result;
use crate::service::Service;

/// Per-workout figures shown alongside a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub workout_id: String,
    pub total_sets: i64,
    pub exercise_count: usize,
    pub muscle_groups: Vec<MuscleGroup>,
}

impl Workout {
    /// Muscle groups are de-duplicated by id in first-seen order.
    pub fn summary(&self) -> WorkoutSummary {
        let mut seen = HashSet::new();
        let muscle_groups = self
            .logged_exercises
            .iter()
            .flat_map(|e| e.exercise_template.muscle_groups.iter())
            .filter(|g| seen.insert(g.id.clone()))
            .cloned()
            .collect();

        WorkoutSummary {
            workout_id: self.id.clone(),
            total_sets: self
                .logged_exercises
                .iter()
                .fold(0i64, |total, e| total.saturating_add(e.sets)),
            exercise_count: self.logged_exercises.len(),
            muscle_groups,
        }
    }
}

impl Service {
    pub async fn workout_summary(&self, workout_id: &str) -> Result<WorkoutSummary> {
        Ok(self.get_workout(workout_id).await?.summary())
    }
}
