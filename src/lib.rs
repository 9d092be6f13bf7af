pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod stats;
pub mod survey;
pub mod views;

pub use dashboard::Dashboard;
pub use error::PipelineError;
