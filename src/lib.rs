//! Device-tree profile selector.
//!
//! Interactive tool for handheld consoles that share one boot card image:
//! the operator picks a brand and a device, stale device-tree artifacts are
//! removed from the boot directory, and the device's bundle plus its shared
//! overlays are copied in.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: the device catalog (built-in or TOML) and its validation
//! - **[`selection`]**: the brand → device menu state machine
//! - **[`resources`]**: cleaning, merge-copying, and the language tag
//! - **[`deploy`]**: the ordered deployment run over injected I/O
//! - **[`commands`]**: top-level subcommands (`deploy`, `list`, `check`, ...)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod operations;
pub mod prompt;
pub mod resources;
pub mod selection;
