//! State of the interactive pages.
//!
//! Each page keeps local state seeded from the adapters. User actions never
//! fail the page: errors are logged and the state is left as it was.

pub mod dashboard;
pub mod task_page;

pub use dashboard::Dashboard;
pub use task_page::TaskPage;
