//! Core entity definitions for Tarefas+.
//!
//! This crate defines the data types shared by the store, the protocol and
//! the server: tasks, comments, and the identity of the caller.

mod comment;
mod identity;
mod task;

pub use comment::*;
pub use identity::*;
pub use task::*;
