// Core modules
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod document;
pub mod infrastructure;
pub mod models;
pub mod report;
