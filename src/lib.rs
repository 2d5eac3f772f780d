pub mod checklist;
pub mod config;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod store;
pub mod tui;
