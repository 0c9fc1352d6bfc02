pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod render;
pub mod search;
pub mod tools;
