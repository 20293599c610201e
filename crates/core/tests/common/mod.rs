/// Configurations, temporary files and log capture.
pub mod harness;
