//! Read side: hydrated workouts and catalog listings.

use log::debug;
use sqlx::SqliteConnection;
use std::collections::HashMap;

use crate::db::models::{
    ExerciseTemplate, ExerciseTemplateRow, LoggedExercise, LoggedExerciseRow, MuscleGroup,
    TemplateMuscleGroupRow, User, Workout, WorkoutRow,
};
use crate::db::operations::{self, TemplateScope};
use crate::errors::{LiftlogError, Result};
use crate::service::{Service, UserId};

impl Service {
    /// All workouts owned by `user`, newest first, fully hydrated.
    ///
    /// An unknown user simply owns nothing.
    pub async fn list_workouts_for_user(&self, user: &UserId) -> Result<Vec<Workout>> {
        let mut tx = self.db_pool.begin().await?;
        let rows = operations::get_workouts_for_user(&mut tx, user.as_str()).await?;
        let line_items = operations::get_logged_exercises_for_user(&mut tx, user.as_str()).await?;
        let links =
            operations::get_template_muscle_groups(&mut tx, TemplateScope::Owner(user.as_str()))
                .await?;
        tx.commit().await?;

        debug!("Loaded {} workouts for user {}", rows.len(), user);
        Ok(assemble(rows, line_items, links))
    }

    pub async fn get_workout(&self, workout_id: &str) -> Result<Workout> {
        let mut tx = self.db_pool.begin().await?;
        let workout = load_workout(&mut tx, workout_id).await?;
        tx.commit().await?;
        workout.ok_or_else(|| LiftlogError::not_found("workout", workout_id))
    }

    /// Templates sorted by name, optionally only those tagged with
    /// `muscle_group`. The group is matched case-insensitively against the
    /// stored uppercase names; a blank filter means no filter.
    pub async fn list_exercise_templates(
        &self,
        muscle_group: Option<&str>,
    ) -> Result<Vec<ExerciseTemplate>> {
        let canonical = muscle_group
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_uppercase);

        let mut tx = self.db_pool.begin().await?;
        let templates = operations::get_exercise_templates(&mut tx, canonical.as_deref()).await?;
        let links = operations::get_template_muscle_groups(&mut tx, TemplateScope::All).await?;
        tx.commit().await?;

        let groups_by_template = group_links(links);
        Ok(templates
            .into_iter()
            .map(|row| into_template(row, &groups_by_template))
            .collect())
    }

    pub async fn list_muscle_groups(&self) -> Result<Vec<MuscleGroup>> {
        let mut conn = self.db_pool.acquire().await?;
        Ok(operations::get_muscle_groups(&mut conn).await?)
    }

    pub async fn get_user(&self, user: &UserId) -> Result<User> {
        let mut conn = self.db_pool.acquire().await?;
        operations::get_user(&mut conn, user.as_str())
            .await?
            .ok_or_else(|| LiftlogError::not_found("user", user.as_str()))
    }
}

/// Loads one workout with everything hanging off it. Runs on whatever
/// connection it is given, so commands can hydrate inside their transaction.
pub(crate) async fn load_workout(
    conn: &mut SqliteConnection,
    workout_id: &str,
) -> Result<Option<Workout>> {
    let Some(row) = operations::get_workout(conn, workout_id).await? else {
        return Ok(None);
    };
    let line_items = operations::get_logged_exercises_for_workout(conn, workout_id).await?;
    let links =
        operations::get_template_muscle_groups(conn, TemplateScope::Workout(workout_id)).await?;

    Ok(assemble(vec![row], line_items, links).pop())
}

fn group_links(links: Vec<TemplateMuscleGroupRow>) -> HashMap<String, Vec<MuscleGroup>> {
    let mut grouped: HashMap<String, Vec<MuscleGroup>> = HashMap::new();
    for link in links {
        grouped
            .entry(link.exercise_template_id)
            .or_default()
            .push(MuscleGroup {
                id: link.muscle_group_id,
                name: link.muscle_group_name,
            });
    }
    grouped
}

fn into_template(
    row: ExerciseTemplateRow,
    groups_by_template: &HashMap<String, Vec<MuscleGroup>>,
) -> ExerciseTemplate {
    let muscle_groups = groups_by_template.get(&row.id).cloned().unwrap_or_default();
    ExerciseTemplate {
        id: row.id,
        name: row.name,
        muscle_groups,
    }
}

/// Stitches flat rows back into aggregates, keeping the order of `rows` and
/// each workout's line-item order.
fn assemble(
    rows: Vec<WorkoutRow>,
    line_items: Vec<LoggedExerciseRow>,
    links: Vec<TemplateMuscleGroupRow>,
) -> Vec<Workout> {
    let groups_by_template = group_links(links);

    let mut items_by_workout: HashMap<String, Vec<LoggedExercise>> = HashMap::new();
    for item in line_items {
        let template = into_template(
            ExerciseTemplateRow {
                id: item.exercise_template_id.clone(),
                name: item.exercise_template_name,
            },
            &groups_by_template,
        );
        items_by_workout
            .entry(item.workout_id.clone())
            .or_default()
            .push(LoggedExercise {
                id: item.id,
                sets: item.sets,
                reps: item.reps,
                weight: item.weight,
                workout_id: item.workout_id,
                exercise_template_id: item.exercise_template_id,
                exercise_template: template,
            });
    }

    rows.into_iter()
        .map(|row| Workout {
            logged_exercises: items_by_workout.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            completed: row.completed,
            created_at: row.created_at,
            user_id: row.user_id,
        })
        .collect()
}
