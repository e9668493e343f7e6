//! HTTP API definitions for Tarefas+ server/client communication
//!
//! This crate defines the JSON bodies exchanged with the Tarefas+ server and
//! the error envelope returned on failure.

mod error;
pub mod requests;
pub mod responses;

pub use error::*;
