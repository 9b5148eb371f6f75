//! Query and command service over the workout aggregate and the catalog.
//!
//! `Service` is the single entry point the server and CLI use. Every write
//! runs inside one transaction; reads see one consistent snapshot.

mod commands;
mod identity;
mod queries;
mod service;
mod summary;
mod validation;

pub use identity::UserId;
pub use service::Service;
pub use summary::WorkoutSummary;
