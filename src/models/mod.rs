pub mod auth;
pub mod wellbeing;
