pub mod agents;
pub mod assets;
pub mod commands;
pub mod config;
pub mod error;
pub mod feature;
pub mod git;
pub mod io;
pub mod paths;
pub mod prompt;
pub mod template;
pub mod workspace;

pub use error::{Result, TechnocratError};
