//! Declarative dotfile symlink manager.
//!
//! A sync file (`dotlink.yaml`) lists `{src, dest}` pairs; `dotlink sync`
//! makes every `dest` a symlink pointing at its `src`, resolving relative
//! sources against the sync file's directory.  Existing files that are not
//! symlinks are never overwritten.
//!
//! The public API is organised into these layers:
//!
//! - **[`schema`]**: the sync file format and its on-disk store
//! - **[`resources`]**: idempotent `check + apply` symlink primitive
//! - **[`reconcile`]**: the engine that applies a schema to the filesystem
//! - **[`registration`]**: validated appends to a schema
//! - **[`config`]**: which sync file the commands operate on
//! - **[`commands`]**: top-level subcommand orchestration (`init`, `add`, `sync`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod operations;
pub mod paths;
pub mod reconcile;
pub mod registration;
pub mod resources;
pub mod schema;
