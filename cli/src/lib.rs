//! qrlabel application library: CLI surface, layered configuration, and
//! the export/output/clipboard services behind it.

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod services;
