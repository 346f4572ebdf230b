pub mod activity;
pub mod dashboard;
pub mod plan;
pub mod settings;
