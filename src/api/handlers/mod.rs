pub mod auth;
pub mod courses;
pub mod lessons;
pub mod payments;
pub mod root;
pub mod subscriptions;
pub mod users;
