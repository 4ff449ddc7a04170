//! CLI command handlers.

pub mod config;
pub mod dialogue;
pub mod listen;
pub mod scene;
pub mod translate;
pub mod view;
