//! Shared fixtures for the service tests.

use crate::db::seed::TEST_USER_ID;
use crate::{Service, UserId};

/// In-memory store with migrations applied and the catalog plus test user
/// seeded.
pub async fn setup_test_service() -> Service {
    let service = Service::in_memory()
        .await
        .expect("Failed to create in-memory database");
    service.seed().await.expect("Failed to seed database");
    service
}

pub fn test_user() -> UserId {
    UserId::parse(Some(TEST_USER_ID)).expect("test user id is valid")
}

pub async fn template_id(service: &Service, name: &str) -> String {
    service
        .list_exercise_templates(None)
        .await
        .expect("Failed to list templates")
        .into_iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("no seeded template named {name}"))
        .id
}
