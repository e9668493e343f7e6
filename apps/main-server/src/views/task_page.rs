//! Public task page with its comment thread.

use entities::{Comment, Identity, Task};
use task_store::TaskStore;

use crate::error::ServerResult;
use crate::services::{CommentService, TaskService};

/// A public task and its comments.
///
/// Comments are fetched once on open; afterwards the local list follows the
/// page's own writes only.
pub struct TaskPage<S: TaskStore + ?Sized> {
    task: Task,
    comments: Vec<Comment>,
    input: String,
    service: CommentService<S>,
}

impl<S: TaskStore + ?Sized + 'static> TaskPage<S> {
    /// Opens the page of a public task.
    ///
    /// Fails with not found for missing and private tasks.
    pub async fn open(
        tasks: &TaskService<S>,
        service: CommentService<S>,
        task_id: &str,
    ) -> ServerResult<Self> {
        let task = tasks.get_public_task(task_id).await?;
        let comments = service.list_comments_for_task(&task.id).await?;

        Ok(Self {
            task,
            comments,
            input: String::new(),
            service,
        })
    }

    /// Returns the task.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the local comment list.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Consumes the page, returning the task and its comments.
    pub fn into_parts(self) -> (Task, Vec<Comment>) {
        (self.task, self.comments)
    }

    /// Returns the comment draft.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the comment draft.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Returns true if `viewer` may post comments: signed in with a name.
    pub fn can_comment(viewer: Option<&Identity>) -> bool {
        viewer.is_some_and(|viewer| viewer.named().is_some())
    }

    /// Returns true if `viewer` may delete `comment`.
    pub fn can_delete(comment: &Comment, viewer: Option<&Identity>) -> bool {
        viewer.is_some_and(|viewer| comment.is_authored_by(&viewer.email))
    }

    /// Posts the draft as a comment by `viewer` and appends it locally.
    pub async fn post_comment(&mut self, viewer: Option<&Identity>) -> bool {
        if self.input.is_empty() {
            return false;
        }

        match self
            .service
            .create_comment(viewer, &self.task.id, &self.input)
            .await
        {
            Ok(comment) => {
                self.comments.push(comment);
                self.input.clear();
                true
            }
            Err(e) => {
                tracing::warn!(task_id = %self.task.id, error = %e, "Failed to post comment");
                false
            }
        }
    }

    /// Deletes a comment of `viewer` and removes it locally.
    pub async fn delete_comment(&mut self, viewer: &Identity, comment_id: &str) -> bool {
        match self.service.delete_comment(viewer, comment_id).await {
            Ok(()) => {
                self.comments.retain(|comment| comment.id != comment_id);
                true
            }
            Err(e) => {
                tracing::warn!(comment_id = %comment_id, error = %e, "Failed to delete comment");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use task_store::MemoryTaskStore;

    use super::*;

    struct Fixture {
        store: Arc<MemoryTaskStore>,
        tasks: TaskService<MemoryTaskStore>,
        comments: CommentService<MemoryTaskStore>,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryTaskStore::new());
            Self {
                tasks: TaskService::new(store.clone()),
                comments: CommentService::new(store.clone()),
                store,
            }
        }

        async fn task(&self, is_public: bool) -> Task {
            self.tasks
                .create_task(&Identity::new("a@x.com"), "Buy milk", is_public)
                .await
                .unwrap()
        }

        async fn open(&self, task_id: &str) -> ServerResult<TaskPage<MemoryTaskStore>> {
            TaskPage::open(&self.tasks, self.comments.clone(), task_id).await
        }
    }

    #[tokio::test]
    async fn test_private_task_page_is_not_found() {
        let fixture = Fixture::new();
        let task = fixture.task(false).await;

        let err = fixture.open(&task.id).await.err().unwrap();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_page_seeds_existing_comments() {
        let fixture = Fixture::new();
        let task = fixture.task(true).await;
        let carla = Identity::new("c@x.com").with_name("Carla");
        fixture
            .comments
            .create_comment(Some(&carla), &task.id, "first")
            .await
            .unwrap();

        let page = fixture.open(&task.id).await.unwrap();
        assert_eq!(page.task().id, task.id);
        assert_eq!(page.comments().len(), 1);
    }

    #[tokio::test]
    async fn test_post_and_delete_comment() {
        let fixture = Fixture::new();
        let task = fixture.task(true).await;
        let carla = Identity::new("c@x.com").with_name("Carla");

        let mut page = fixture.open(&task.id).await.unwrap();
        let before = page.comments().len();

        page.set_input("nice!");
        assert!(page.post_comment(Some(&carla)).await);
        assert_eq!(page.comments().len(), before + 1);
        assert_eq!(page.input(), "");

        let comment = page.comments().last().unwrap().clone();
        assert_eq!(comment.author, "c@x.com");
        assert!(TaskPage::<MemoryTaskStore>::can_delete(&comment, Some(&carla)));

        assert!(page.delete_comment(&carla, &comment.id).await);
        assert_eq!(page.comments().len(), before);
        assert_eq!(fixture.store.count_comments().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_post_leaves_list_unchanged() {
        let fixture = Fixture::new();
        let task = fixture.task(true).await;

        let mut page = fixture.open(&task.id).await.unwrap();
        page.set_input("nice!");

        assert!(!TaskPage::<MemoryTaskStore>::can_comment(None));
        assert!(!page.post_comment(None).await);
        assert!(page.comments().is_empty());
        assert_eq!(page.input(), "nice!");
        assert_eq!(fixture.store.count_comments().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_nameless_post_leaves_list_unchanged() {
        let fixture = Fixture::new();
        let task = fixture.task(true).await;
        let nameless = Identity::new("c@x.com");

        let mut page = fixture.open(&task.id).await.unwrap();
        page.set_input("nice!");

        assert!(!TaskPage::<MemoryTaskStore>::can_comment(Some(&nameless)));
        assert!(!page.post_comment(Some(&nameless)).await);
        assert!(page.comments().is_empty());
        assert_eq!(page.input(), "nice!");
        assert_eq!(fixture.store.count_comments().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_other_user_keeps_comment() {
        let fixture = Fixture::new();
        let task = fixture.task(true).await;
        let carla = Identity::new("c@x.com").with_name("Carla");
        let ana = Identity::new("a@x.com");

        let mut page = fixture.open(&task.id).await.unwrap();
        page.set_input("nice!");
        assert!(page.post_comment(Some(&carla)).await);
        let comment_id = page.comments()[0].id.clone();

        assert!(!TaskPage::<MemoryTaskStore>::can_delete(&page.comments()[0], Some(&ana)));
        assert!(!page.delete_comment(&ana, &comment_id).await);
        assert_eq!(page.comments().len(), 1);

        assert!(!page.delete_comment(&carla, "missing").await);
        assert_eq!(page.comments().len(), 1);
    }
}
