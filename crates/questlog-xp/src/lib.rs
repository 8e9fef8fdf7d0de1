pub mod config;
pub mod error;
pub mod import;
pub mod telemetry;
pub mod xp;
