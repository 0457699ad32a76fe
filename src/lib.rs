#![deny(clippy::mod_module_files)]
//! Migrate gx (IPFS) dependencies to Go modules.
//!
//! The gx graph under a project is walked from its `package.json`, each
//! package is mapped to the git repository that hosts it, and its gx hash
//! is resolved to a semver tag or a commit of that repository.

pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod gomod;
pub mod graph;
pub mod locator;
pub mod manifest;
pub mod resolve;

pub use error::{Error, Result};
