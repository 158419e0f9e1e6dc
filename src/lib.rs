pub mod assemble;
pub mod build;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod mail;
pub mod resolve;
