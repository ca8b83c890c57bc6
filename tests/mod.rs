// Integration tests for pgbaseline

pub mod cli;
pub mod helpers;
pub mod integration;
