//! Core library components.
//!
//! The secret lifecycle engine (`cipher`, `broker`, `wrapper`) plus the
//! collaborators it is wired to: key stores, configuration and the editor.

pub mod broker;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod deployment;
pub mod detect;
pub mod editor;
pub mod keys;
pub mod store;
pub mod types;
pub mod wrapper;
