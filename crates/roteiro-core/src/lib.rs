//! Core roteiro library (script model, text views, session, collaborators).

pub mod config;
pub mod edits;
pub mod format;
pub mod parse;
pub mod script;
pub mod session;
pub mod speech;
pub mod store;
pub mod translate;
