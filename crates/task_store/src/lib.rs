//! Task and comment storage for Tarefas+
//!
//! This crate provides the storage abstraction behind the task and comment
//! adapters. Persisted records keep the document schema of the hosted store
//! (`tarefas` and `comments` collections) and are parsed into entities at the
//! crate edge. Every write is published on a change feed so that live task
//! lists can follow the store.

mod error;
mod feed;
mod memory;
mod record;
mod sqlite;
mod subscription;
mod traits;

pub use error::*;
pub use feed::*;
pub use memory::*;
pub use record::*;
pub use sqlite::*;
pub use subscription::*;
pub use traits::*;
