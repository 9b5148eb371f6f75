use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct MuscleGroup {
    pub id: String,
    pub name: String,
}

// Catalog models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplate {
    pub id: String,
    pub name: String,
    pub muscle_groups: Vec<MuscleGroup>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseTemplateRow {
    pub id: String,
    pub name: String,
}

/// One edge of the template/muscle-group association, with the group's name
/// joined in.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemplateMuscleGroupRow {
    pub exercise_template_id: String,
    pub muscle_group_id: String,
    pub muscle_group_name: String,
}

// Workout models
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRow {
    pub id: String,
    pub name: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LoggedExerciseRow {
    pub id: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub workout_id: String,
    pub exercise_template_id: String,
    pub exercise_template_name: String,
}

/// A workout with its line items, each carrying its template and the
/// template's muscle groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub logged_exercises: Vec<LoggedExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedExercise {
    pub id: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub workout_id: String,
    pub exercise_template_id: String,
    pub exercise_template: ExerciseTemplate,
}

impl fmt::Display for LoggedExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weight_str = self
            .weight
            .map(|w| format!(" @ {:.1}kg", w))
            .unwrap_or_default();

        write!(
            f,
            "{}: {} x {}{}",
            self.exercise_template.name, self.sets, self.reps, weight_str
        )
    }
}

/// Line item as submitted by a caller, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoggedExercise {
    pub exercise_template_id: String,
    pub sets: i64,
    pub reps: i64,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl NewLoggedExercise {
    pub fn new(exercise_template_id: impl Into<String>, sets: i64, reps: i64) -> Self {
        Self {
            exercise_template_id: exercise_template_id.into(),
            sets,
            reps,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_item_deserializes_from_camel_case_without_weight() {
        let item: NewLoggedExercise =
            serde_json::from_str(r#"{"exerciseTemplateId":"t1","sets":3,"reps":10}"#).unwrap();
        assert_eq!(item, NewLoggedExercise::new("t1", 3, 10));
    }

    #[test]
    fn logged_exercise_display_includes_weight_when_present() {
        let template = ExerciseTemplate {
            id: "t1".into(),
            name: "Squat".into(),
            muscle_groups: vec![],
        };
        let mut item = LoggedExercise {
            id: "l1".into(),
            sets: 5,
            reps: 5,
            weight: Some(100.0),
            workout_id: "w1".into(),
            exercise_template_id: "t1".into(),
            exercise_template: template,
        };
        assert_eq!(item.to_string(), "Squat: 5 x 5 @ 100.0kg");
        item.weight = None;
        assert_eq!(item.to_string(), "Squat: 5 x 5");
    }
}
