//! Task and comment adapters over the store.

pub mod comments;
pub mod share;
pub mod tasks;
pub mod visibility;

pub use comments::CommentService;
pub use share::build_share_link;
pub use tasks::TaskService;
