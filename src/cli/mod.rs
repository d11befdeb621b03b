//! CLI module for scanlog - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
