//! Share links.

/// Builds the link under which a public task can be opened.
///
/// `<base_url>/task/<task_id>`; a trailing slash on `base_url` is not
/// repeated.
pub fn build_share_link(base_url: &str, task_id: &str) -> String {
    format!("{}/task/{}", base_url.trim_end_matches('/'), task_id)
}
