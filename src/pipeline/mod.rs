pub mod dashboard;
pub mod pace;
pub mod plan;
pub mod recommend;
pub mod reconcile;
