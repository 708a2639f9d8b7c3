/// Application.
pub mod app;
/// Command-line arguments
pub mod args;
/// Log output
pub mod logging;
/// Querying of Slurm state
pub mod slurm;
/// Report rendering
pub mod ui;
/// Custom widgets
pub mod widgets;
