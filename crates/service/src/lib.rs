//! Service layer: business rules on top of the `models` entities.
//! - Role policy, requisition state machine and point arithmetic are pure modules.
//! - `services` holds the database-backed operations, one module per entity.
//! - Notifications go through a [`mailer::Mailer`] so delivery can be swapped.

pub mod errors;
pub mod access;
pub mod requisition;
pub mod gamification;
pub mod metrics;
pub mod mailer;
pub mod auth;
pub mod services;
#[cfg(test)]
pub mod test_support;

pub use access::{Actor, Permission};
pub use errors::ServiceError;
pub use services::notification_service::Notifier;
