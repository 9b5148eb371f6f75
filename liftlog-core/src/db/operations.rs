//! Single-statement store operations.
//!
//! Everything here takes a bare connection so the service decides where
//! the transaction boundary sits: pass `&mut *tx` to run inside one, or a
//! pooled connection to run standalone.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::models::{
    ExerciseTemplateRow, LoggedExerciseRow, MuscleGroup, NewLoggedExercise, TemplateMuscleGroupRow,
    User, WorkoutRow,
};

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Which templates' muscle-group edges to load.
#[derive(Debug, Clone, Copy)]
pub enum TemplateScope<'a> {
    All,
    Workout(&'a str),
    Owner(&'a str),
}

// Users
pub async fn get_user(conn: &mut SqliteConnection, user_id: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT id, email FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn user_exists(conn: &mut SqliteConnection, user_id: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

/// Inserts the user unless the id or email is already taken, then returns
/// whichever row owns `email`.
pub async fn get_or_create_user(
    conn: &mut SqliteConnection,
    user_id: &str,
    email: &str,
) -> sqlx::Result<User> {
    sqlx::query("INSERT OR IGNORE INTO users (id, email) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(email)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as::<_, User>("SELECT id, email FROM users WHERE email = ?1")
        .bind(email)
        .fetch_one(&mut *conn)
        .await
}

// Catalog
pub async fn get_muscle_groups(conn: &mut SqliteConnection) -> sqlx::Result<Vec<MuscleGroup>> {
    sqlx::query_as::<_, MuscleGroup>("SELECT id, name FROM muscle_groups ORDER BY name ASC")
        .fetch_all(&mut *conn)
        .await
}

pub async fn get_or_create_muscle_group(
    conn: &mut SqliteConnection,
    name: &str,
) -> sqlx::Result<MuscleGroup> {
    sqlx::query("INSERT OR IGNORE INTO muscle_groups (id, name) VALUES (?1, ?2)")
        .bind(new_id())
        .bind(name)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as::<_, MuscleGroup>("SELECT id, name FROM muscle_groups WHERE name = ?1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}

/// Returns the template named `name` and whether this call created it.
pub async fn get_or_create_exercise_template(
    conn: &mut SqliteConnection,
    name: &str,
) -> sqlx::Result<(ExerciseTemplateRow, bool)> {
    let inserted = sqlx::query("INSERT OR IGNORE INTO exercise_templates (id, name) VALUES (?1, ?2)")
        .bind(new_id())
        .bind(name)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let template = sqlx::query_as::<_, ExerciseTemplateRow>(
        "SELECT id, name FROM exercise_templates WHERE name = ?1",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    Ok((template, inserted > 0))
}

pub async fn link_template_muscle_group(
    conn: &mut SqliteConnection,
    exercise_template_id: &str,
    muscle_group_id: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO exercise_template_muscle_groups (exercise_template_id, muscle_group_id)
         VALUES (?1, ?2)",
    )
    .bind(exercise_template_id)
    .bind(muscle_group_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn exercise_template_exists(
    conn: &mut SqliteConnection,
    exercise_template_id: &str,
) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercise_templates WHERE id = ?1")
        .bind(exercise_template_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

/// All templates, or only those tagged with the canonical group `muscle_group`.
pub async fn get_exercise_templates(
    conn: &mut SqliteConnection,
    muscle_group: Option<&str>,
) -> sqlx::Result<Vec<ExerciseTemplateRow>> {
    match muscle_group {
        Some(group) => {
            sqlx::query_as::<_, ExerciseTemplateRow>(
                "SELECT et.id, et.name
                 FROM exercise_templates et
                 WHERE EXISTS (
                     SELECT 1
                     FROM exercise_template_muscle_groups etm
                     JOIN muscle_groups mg ON mg.id = etm.muscle_group_id
                     WHERE etm.exercise_template_id = et.id AND mg.name = ?1
                 )
                 ORDER BY et.name ASC",
            )
            .bind(group)
            .fetch_all(&mut *conn)
            .await
        }
        None => {
            sqlx::query_as::<_, ExerciseTemplateRow>(
                "SELECT id, name FROM exercise_templates ORDER BY name ASC",
            )
            .fetch_all(&mut *conn)
            .await
        }
    }
}

pub async fn get_template_muscle_groups(
    conn: &mut SqliteConnection,
    scope: TemplateScope<'_>,
) -> sqlx::Result<Vec<TemplateMuscleGroupRow>> {
    const SELECT: &str = "SELECT etm.exercise_template_id,
                                 mg.id AS muscle_group_id,
                                 mg.name AS muscle_group_name
                          FROM exercise_template_muscle_groups etm
                          JOIN muscle_groups mg ON mg.id = etm.muscle_group_id";

    match scope {
        TemplateScope::All => {
            sqlx::query_as::<_, TemplateMuscleGroupRow>(&format!("{SELECT} ORDER BY mg.name ASC"))
                .fetch_all(&mut *conn)
                .await
        }
        TemplateScope::Workout(workout_id) => {
            sqlx::query_as::<_, TemplateMuscleGroupRow>(&format!(
                "{SELECT}
                 WHERE etm.exercise_template_id IN (
                     SELECT exercise_template_id FROM logged_exercises WHERE workout_id = ?1
                 )
                 ORDER BY mg.name ASC"
            ))
            .bind(workout_id)
            .fetch_all(&mut *conn)
            .await
        }
        TemplateScope::Owner(user_id) => {
            sqlx::query_as::<_, TemplateMuscleGroupRow>(&format!(
                "{SELECT}
                 WHERE etm.exercise_template_id IN (
                     SELECT le.exercise_template_id
                     FROM logged_exercises le
                     JOIN workouts w ON w.id = le.workout_id
                     WHERE w.user_id = ?1
                 )
                 ORDER BY mg.name ASC"
            ))
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await
        }
    }
}

// Workouts
pub async fn insert_workout(
    conn: &mut SqliteConnection,
    workout_id: &str,
    user_id: &str,
    name: &str,
    created_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO workouts (id, name, completed, created_at, user_id) VALUES (?1, ?2, 0, ?3, ?4)",
    )
    .bind(workout_id)
    .bind(name)
    .bind(created_at)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn get_workout(
    conn: &mut SqliteConnection,
    workout_id: &str,
) -> sqlx::Result<Option<WorkoutRow>> {
    sqlx::query_as::<_, WorkoutRow>(
        "SELECT id, name, completed, created_at, user_id FROM workouts WHERE id = ?1",
    )
    .bind(workout_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Newest first; rowid breaks ties between workouts created in the same instant.
pub async fn get_workouts_for_user(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> sqlx::Result<Vec<WorkoutRow>> {
    sqlx::query_as::<_, WorkoutRow>(
        "SELECT id, name, completed, created_at, user_id
         FROM workouts
         WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn update_workout_name(
    conn: &mut SqliteConnection,
    workout_id: &str,
    name: &str,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE workouts SET name = ?1 WHERE id = ?2")
        .bind(name)
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_workout_completed(
    conn: &mut SqliteConnection,
    workout_id: &str,
    completed: bool,
) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE workouts SET completed = ?1 WHERE id = ?2")
        .bind(completed)
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// Line items go with the workout through the cascading foreign key.
pub async fn delete_workout(conn: &mut SqliteConnection, workout_id: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = ?1")
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

// Logged exercises
pub async fn insert_logged_exercise(
    conn: &mut SqliteConnection,
    workout_id: &str,
    position: i64,
    item: &NewLoggedExercise,
) -> sqlx::Result<String> {
    let id = new_id();
    sqlx::query(
        "INSERT INTO logged_exercises (id, sets, reps, weight, position, workout_id, exercise_template_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&id)
    .bind(item.sets)
    .bind(item.reps)
    .bind(item.weight)
    .bind(position)
    .bind(workout_id)
    .bind(&item.exercise_template_id)
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn delete_logged_exercises_for_workout(
    conn: &mut SqliteConnection,
    workout_id: &str,
) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM logged_exercises WHERE workout_id = ?1")
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_logged_exercises_for_workout(
    conn: &mut SqliteConnection,
    workout_id: &str,
) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM logged_exercises WHERE workout_id = ?1")
        .bind(workout_id)
        .fetch_one(&mut *conn)
        .await
}

pub async fn get_logged_exercises_for_workout(
    conn: &mut SqliteConnection,
    workout_id: &str,
) -> sqlx::Result<Vec<LoggedExerciseRow>> {
    sqlx::query_as::<_, LoggedExerciseRow>(
        "SELECT le.id, le.sets, le.reps, le.weight, le.workout_id,
                le.exercise_template_id, et.name AS exercise_template_name
         FROM logged_exercises le
         JOIN exercise_templates et ON et.id = le.exercise_template_id
         WHERE le.workout_id = ?1
         ORDER BY le.position ASC",
    )
    .bind(workout_id)
    .fetch_all(&mut *conn)
    .await
}

/// Every line item across all of a user's workouts, read in one statement.
pub async fn get_logged_exercises_for_user(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> sqlx::Result<Vec<LoggedExerciseRow>> {
    sqlx::query_as::<_, LoggedExerciseRow>(
        "SELECT le.id, le.sets, le.reps, le.weight, le.workout_id,
                le.exercise_template_id, et.name AS exercise_template_name
         FROM logged_exercises le
         JOIN workouts w ON w.id = le.workout_id
         JOIN exercise_templates et ON et.id = le.exercise_template_id
         WHERE w.user_id = ?1
         ORDER BY le.workout_id ASC, le.position ASC",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
}
