//! Write side. Each command is one transaction: it either commits whole or
//! leaves the store exactly as it found it.

use chrono::Utc;
use log::info;
use sqlx::SqliteConnection;

use crate::db::models::{NewLoggedExercise, Workout};
use crate::db::operations::{self, new_id};
use crate::errors::{LiftlogError, Result};
use crate::service::queries::load_workout;
use crate::service::{Service, UserId, validation};

impl Service {
    /// Creates a workout owned by `user` together with its line items.
    pub async fn create_workout(
        &self,
        user: &UserId,
        name: &str,
        line_items: &[NewLoggedExercise],
    ) -> Result<Workout> {
        let name = validation::workout_name(name)?;
        validation::line_items(line_items)?;

        let mut tx = self.db_pool.begin().await?;
        if !operations::user_exists(&mut tx, user.as_str()).await? {
            return Err(LiftlogError::not_found("user", user.as_str()));
        }

        let workout_id = new_id();
        operations::insert_workout(&mut tx, &workout_id, user.as_str(), &name, Utc::now()).await?;
        insert_line_items(&mut tx, &workout_id, line_items).await?;

        let workout = load_workout(&mut tx, &workout_id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("workout", workout_id.as_str()))?;
        tx.commit().await?;

        info!(
            "Created workout {} for user {} with {} exercises",
            workout.id,
            user,
            workout.logged_exercises.len()
        );
        Ok(workout)
    }

    /// Swaps the whole line-item set of a workout, optionally renaming it.
    ///
    /// The old set is deleted before the new one is checked and inserted;
    /// any failure past that point rolls the delete back with everything
    /// else, so readers see either the old set or the new one.
    pub async fn replace_workout_exercises(
        &self,
        workout_id: &str,
        name: Option<&str>,
        line_items: &[NewLoggedExercise],
    ) -> Result<Workout> {
        let name = name.map(validation::workout_name).transpose()?;
        validation::line_items(line_items)?;

        let mut tx = self.db_pool.begin().await?;
        if operations::get_workout(&mut tx, workout_id).await?.is_none() {
            return Err(LiftlogError::not_found("workout", workout_id));
        }

        let removed = operations::delete_logged_exercises_for_workout(&mut tx, workout_id).await?;
        if let Some(name) = &name {
            operations::update_workout_name(&mut tx, workout_id, name).await?;
        }
        insert_line_items(&mut tx, workout_id, line_items).await?;

        let workout = load_workout(&mut tx, workout_id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("workout", workout_id))?;
        tx.commit().await?;

        info!(
            "Replaced {} exercises with {} on workout {}",
            removed,
            workout.logged_exercises.len(),
            workout_id
        );
        Ok(workout)
    }

    /// Sets the completion flag. Setting the value it already has succeeds.
    pub async fn set_completion(&self, workout_id: &str, completed: bool) -> Result<Workout> {
        let mut tx = self.db_pool.begin().await?;
        if operations::set_workout_completed(&mut tx, workout_id, completed).await? == 0 {
            return Err(LiftlogError::not_found("workout", workout_id));
        }

        let workout = load_workout(&mut tx, workout_id)
            .await?
            .ok_or_else(|| LiftlogError::not_found("workout", workout_id))?;
        tx.commit().await?;

        info!("Workout {} marked completed={}", workout_id, completed);
        Ok(workout)
    }

    pub async fn delete_workout(&self, workout_id: &str) -> Result<()> {
        let mut tx = self.db_pool.begin().await?;
        if operations::delete_workout(&mut tx, workout_id).await? == 0 {
            return Err(LiftlogError::not_found("workout", workout_id));
        }
        tx.commit().await?;

        info!("Deleted workout {}", workout_id);
        Ok(())
    }
}

async fn insert_line_items(
    conn: &mut SqliteConnection,
    workout_id: &str,
    line_items: &[NewLoggedExercise],
) -> Result<()> {
    for (position, item) in line_items.iter().enumerate() {
        if !operations::exercise_template_exists(conn, &item.exercise_template_id).await? {
            return Err(LiftlogError::not_found(
                "exercise template",
                item.exercise_template_id.as_str(),
            ));
        }
        let item = NewLoggedExercise {
            weight: validation::normalize_weight(item.weight),
            ..item.clone()
        };
        operations::insert_logged_exercise(conn, workout_id, position as i64, &item).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::db::models::NewLoggedExercise;
    use crate::db::operations;
    use crate::test_utils::{setup_test_service, template_id, test_user};
    use crate::{Service, UserId};

    async fn line_item_count(service: &Service, workout_id: &str) -> i64 {
        let mut conn = service.db_pool.acquire().await.unwrap();
        operations::count_logged_exercises_for_workout(&mut conn, workout_id)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn created_workout_is_listed_for_its_owner() {
        let service = setup_test_service().await;
        let user = test_user();
        let bench = template_id(&service, "Bench Press").await;

        let workout = service
            .create_workout(&user, "Push Day", &[NewLoggedExercise::new(&bench, 3, 8)])
            .await
            .unwrap();
        assert!(!workout.completed);
        assert_eq!(workout.user_id, user.as_str());

        let listed = service.list_workouts_for_user(&user).await.unwrap();
        assert!(listed.iter().any(|w| w.id == workout.id));
    }

    #[tokio::test]
    async fn round_trip_returns_the_submitted_line_item() {
        let service = setup_test_service().await;
        let squat = template_id(&service, "Squat").await;
        let input = NewLoggedExercise::new(&squat, 3, 10);

        let created = service
            .create_workout(&test_user(), "Legs", std::slice::from_ref(&input))
            .await
            .unwrap();
        let fetched = service.get_workout(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.logged_exercises.len(), 1);
        let item = &fetched.logged_exercises[0];
        assert_eq!(item.exercise_template_id, input.exercise_template_id);
        assert_eq!(item.sets, 3);
        assert_eq!(item.reps, 10);
        assert_eq!(item.weight, None);
        assert_eq!(item.workout_id, created.id);
        assert_eq!(item.exercise_template.name, "Squat");
    }

    #[tokio::test]
    async fn line_items_keep_submission_order_and_zero_weight() {
        let service = setup_test_service().await;
        let names = ["Squat", "Bench Press", "Pull Up"];
        let mut items = Vec::new();
        for name in names {
            items.push(NewLoggedExercise::new(template_id(&service, name).await, 3, 10).with_weight(0.0));
        }

        let workout = service.create_workout(&test_user(), "Full Body", &items).await.unwrap();
        let got: Vec<&str> = workout
            .logged_exercises
            .iter()
            .map(|e| e.exercise_template.name.as_str())
            .collect();
        assert_eq!(got, names);
        assert!(workout.logged_exercises.iter().all(|e| e.weight == Some(0.0)));
    }

    #[tokio::test]
    async fn negative_zero_weight_reads_back_as_zero() {
        let service = setup_test_service().await;
        let squat = template_id(&service, "Squat").await;
        let workout = service
            .create_workout(&test_user(), "Legs", &[NewLoggedExercise::new(&squat, 3, 5).with_weight(-0.0)])
            .await
            .unwrap();

        let weight = workout.logged_exercises[0].weight.unwrap();
        assert_eq!(weight, 0.0);
        assert!(weight.is_sign_positive());
    }

    #[tokio::test]
    async fn oversized_counts_are_rejected_before_anything_is_stored() {
        let service = setup_test_service().await;
        let user = test_user();
        let squat = template_id(&service, "Squat").await;

        let err = service
            .create_workout(
                &user,
                "Too Much",
                &[NewLoggedExercise::new(&squat, i64::MAX, 1), NewLoggedExercise::new(&squat, 1, 1)],
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.list_workouts_for_user(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_name_is_rejected_but_empty_line_items_are_fine() {
        let service = setup_test_service().await;
        let user = test_user();

        let err = service.create_workout(&user, "  ", &[]).await.unwrap_err();
        assert!(err.is_validation());

        let workout = service.create_workout(&user, "Rest Day", &[]).await.unwrap();
        assert!(workout.logged_exercises.is_empty());
    }

    #[tokio::test]
    async fn create_with_unknown_template_commits_nothing() {
        let service = setup_test_service().await;
        let user = test_user();
        let squat = template_id(&service, "Squat").await;

        let err = service
            .create_workout(
                &user,
                "Legs",
                &[
                    NewLoggedExercise::new(&squat, 5, 5),
                    NewLoggedExercise::new("no-such-template", 3, 10),
                ],
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(service.list_workouts_for_user(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_for_unknown_user_is_not_found() {
        let service = setup_test_service().await;
        let ghost = UserId::parse(Some("ghost")).unwrap();
        let err = service.create_workout(&ghost, "Legs", &[]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn replace_swaps_line_items_and_renames() {
        let service = setup_test_service().await;
        let squat = template_id(&service, "Squat").await;
        let row = template_id(&service, "Bent Over Row").await;
        let curl = template_id(&service, "Bicep Curl").await;

        let workout = service
            .create_workout(&test_user(), "Draft", &[NewLoggedExercise::new(&squat, 5, 5)])
            .await
            .unwrap();
        let replaced = service
            .replace_workout_exercises(
                &workout.id,
                Some("Pull Day"),
                &[
                    NewLoggedExercise::new(&row, 4, 8).with_weight(60.0),
                    NewLoggedExercise::new(&curl, 3, 12),
                ],
            )
            .await
            .unwrap();

        assert_eq!(replaced.name, "Pull Day");
        assert_eq!(replaced.created_at, workout.created_at);
        let names: Vec<&str> = replaced
            .logged_exercises
            .iter()
            .map(|e| e.exercise_template.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bent Over Row", "Bicep Curl"]);
        assert_eq!(line_item_count(&service, &workout.id).await, 2);
    }

    #[tokio::test]
    async fn replace_without_name_keeps_current_name() {
        let service = setup_test_service().await;
        let workout = service.create_workout(&test_user(), "Keep Me", &[]).await.unwrap();
        let replaced = service
            .replace_workout_exercises(&workout.id, None, &[])
            .await
            .unwrap();
        assert_eq!(replaced.name, "Keep Me");

        let err = service
            .replace_workout_exercises(&workout.id, Some(""), &[])
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn failed_replace_leaves_prior_line_items_intact() {
        let service = setup_test_service().await;
        let squat = template_id(&service, "Squat").await;
        let press = template_id(&service, "Leg Press").await;

        let workout = service
            .create_workout(
                &test_user(),
                "Legs",
                &[
                    NewLoggedExercise::new(&squat, 5, 5).with_weight(100.0),
                    NewLoggedExercise::new(&press, 3, 12),
                ],
            )
            .await
            .unwrap();

        // The old set is already deleted inside the transaction when the
        // unknown template is hit on the second item.
        let err = service
            .replace_workout_exercises(
                &workout.id,
                Some("Renamed"),
                &[
                    NewLoggedExercise::new(&press, 4, 10),
                    NewLoggedExercise::new("no-such-template", 3, 10),
                ],
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let after = service.get_workout(&workout.id).await.unwrap();
        assert_eq!(after, workout);
    }

    #[tokio::test]
    async fn replace_on_missing_workout_is_not_found() {
        let service = setup_test_service().await;
        let err = service
            .replace_workout_exercises("missing", Some("x"), &[])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn set_completion_is_idempotent_and_reversible() {
        let service = setup_test_service().await;
        let workout = service.create_workout(&test_user(), "Cardio", &[]).await.unwrap();

        let once = service.set_completion(&workout.id, true).await.unwrap();
        let twice = service.set_completion(&workout.id, true).await.unwrap();
        assert!(once.completed);
        assert_eq!(once, twice);

        let undone = service.set_completion(&workout.id, false).await.unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.name, workout.name);
    }

    #[tokio::test]
    async fn set_completion_on_missing_workout_is_not_found() {
        let service = setup_test_service().await;
        let err = service.set_completion("missing", true).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_cascades_to_line_items() {
        let service = setup_test_service().await;
        let squat = template_id(&service, "Squat").await;
        let workout = service
            .create_workout(
                &test_user(),
                "Legs",
                &[NewLoggedExercise::new(&squat, 5, 5), NewLoggedExercise::new(&squat, 3, 8)],
            )
            .await
            .unwrap();
        assert_eq!(line_item_count(&service, &workout.id).await, 2);

        service.delete_workout(&workout.id).await.unwrap();

        assert_eq!(line_item_count(&service, &workout.id).await, 0);
        assert!(service.get_workout(&workout.id).await.unwrap_err().is_not_found());
        assert!(service.delete_workout(&workout.id).await.unwrap_err().is_not_found());
    }
}
