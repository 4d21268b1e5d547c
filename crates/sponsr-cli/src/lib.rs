//! Sponsr CLI - command-line front end for the insights feed
//!
//! This crate provides the CLI application that drives the listing and
//! detail loaders against the configured content gateway.

pub mod config;

pub use config::{Command, Config};
