//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, SSH,
//! the HTTP backend, terminal prompts, the config file, and the network sweep.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod backend;
pub mod command_runner;
pub mod config;
pub mod login;
pub mod network;
pub mod prompt;
pub mod scanner;
pub mod ssh;
pub mod update;
