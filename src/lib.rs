pub mod changelog;
pub mod cli;
pub mod codeowners;
pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod result;
pub mod tags;
pub mod vcs;

pub use result::Result;
