pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod service_category;
pub mod service;
pub mod service_requisition;
pub mod comment_evaluation;
pub mod gamification;
pub mod complaint;
pub mod formation;
pub mod enrollment;
pub mod notification;
pub mod content_section;

#[cfg(test)]
mod tests;
