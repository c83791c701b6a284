//! Terminal front end for the blind clock.
//!
//! - [`commands`]: line command parsing
//! - [`config`]: environment and command-line configuration
//! - [`logging`]: tracing subscriber setup
//! - [`render`]: text output for views and events

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
