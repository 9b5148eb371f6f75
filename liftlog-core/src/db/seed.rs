//! Catalog and test-identity seed data.

use anyhow::Result;
use log::{debug, info};
use sqlx::SqlitePool;

use crate::db::models::User;
use crate::db::operations::{
    get_or_create_exercise_template, get_or_create_muscle_group, get_or_create_user,
    link_template_muscle_group,
};

pub const MUSCLE_GROUPS: &[&str] = &[
    "CHEST",
    "BACK",
    "LEGS",
    "SHOULDERS",
    "ARMS",
    "ABS",
    "GLUTES",
    "CALVES",
];

pub const EXERCISE_TEMPLATES: &[(&str, &[&str])] = &[
    ("Bench Press", &["CHEST"]),
    ("Incline Bench Press", &["CHEST"]),
    ("Push Up", &["CHEST"]),
    ("Deadlift", &["BACK", "LEGS"]),
    ("Pull Up", &["BACK"]),
    ("Bent Over Row", &["BACK"]),
    ("Squat", &["LEGS"]),
    ("Leg Press", &["LEGS"]),
    ("Leg Curl", &["LEGS"]),
    ("Shoulder Press", &["SHOULDERS"]),
    ("Lateral Raise", &["SHOULDERS"]),
    ("Bicep Curl", &["ARMS"]),
    ("Tricep Dips", &["ARMS"]),
];

pub const TEST_USER_ID: &str = "test-user-id";
pub const TEST_USER_EMAIL: &str = "test@example.com";

/// Upserts muscle groups and templates by name. Templates that already
/// exist keep their current muscle-group links.
pub async fn seed_catalog(pool: &SqlitePool) -> Result<()> {
    info!("Seeding catalog");
    let mut tx = pool.begin().await?;

    for name in MUSCLE_GROUPS {
        get_or_create_muscle_group(&mut tx, name).await?;
    }

    for (name, groups) in EXERCISE_TEMPLATES {
        let (template, created) = get_or_create_exercise_template(&mut tx, name).await?;
        if !created {
            debug!("Exercise template {} already present, skipping", name);
            continue;
        }
        for group in *groups {
            let muscle_group = get_or_create_muscle_group(&mut tx, group).await?;
            link_template_muscle_group(&mut tx, &template.id, &muscle_group.id).await?;
        }
    }

    tx.commit().await?;
    info!(
        "Catalog seeded: {} muscle groups, {} exercise templates",
        MUSCLE_GROUPS.len(),
        EXERCISE_TEMPLATES.len()
    );
    Ok(())
}

pub async fn seed_test_user(pool: &SqlitePool) -> Result<User> {
    let mut tx = pool.begin().await?;
    let user = get_or_create_user(&mut tx, TEST_USER_ID, TEST_USER_EMAIL).await?;
    tx.commit().await?;
    info!("Test user ready: {}", user.id);
    Ok(user)
}

pub async fn seed_all(pool: &SqlitePool) -> Result<()> {
    seed_catalog(pool).await?;
    seed_test_user(pool).await?;
    Ok(())
}
