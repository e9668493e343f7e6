//! HTTP API tests against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, BodyDataStream, to_bytes},
    http::{Request, StatusCode, header},
};
use entities::Identity;
use futures_util::StreamExt;
use serde_json::{Value, json};
use task_store::MemoryTaskStore;
use tarefas_server::{config::Config, create_app, create_state, state::AppState};
use tokio::time::timeout;
use tower::ServiceExt;

const WAIT: Duration = Duration::from_secs(1);

struct TestApp {
    state: Arc<AppState<MemoryTaskStore>>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let config = Config::new("test-secret").with_public_url("https://tarefas.test");
        let state = create_state(config, MemoryTaskStore::new());
        let router = create_app(state.clone());
        Self { state, router }
    }

    fn token(&self, identity: &Identity) -> String {
        self.state.jwt_manager.generate_token(identity).unwrap()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn post(&self, path: &str, user: Option<&Identity>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::post(path).header(header::CONTENT_TYPE, "application/json");
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    fn get(&self, path: &str, user: Option<&Identity>) -> Request<Body> {
        let mut builder = Request::get(path);
        if let Some(user) = user {
            builder = builder.header(header::COOKIE, format!("tarefas_session={}", self.token(user)));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn create_task(&self, user: &Identity, body: &str, is_public: bool) -> String {
        let (status, response) = self
            .post(
                "/api/task/create",
                Some(user),
                json!({ "body": body, "is_public": is_public }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        response["task"]["id"].as_str().unwrap().to_string()
    }
}

/// Reads `tasks` events off a task list stream.
struct TaskEvents {
    stream: BodyDataStream,
    buffer: String,
}

impl TaskEvents {
    async fn open(app: &TestApp, user: &Identity) -> Self {
        let response = app
            .router
            .clone()
            .oneshot(app.get("/api/task/watch", Some(user)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/event-stream")
        );

        Self {
            stream: response.into_body().into_data_stream(),
            buffer: String::new(),
        }
    }

    /// Returns the task list of the next `tasks` event.
    async fn next(&mut self) -> Vec<Value> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let frame: String = self.buffer.drain(..end + 2).collect();
                if !frame.lines().any(|line| line == "event: tasks") {
                    continue;
                }
                let data = frame
                    .lines()
                    .find_map(|line| line.strip_prefix("data: "))
                    .unwrap();
                let event: Value = serde_json::from_str(data).unwrap();
                return event["tasks"].as_array().unwrap().clone();
            }

            let chunk = self.stream.next().await.unwrap().unwrap();
            self.buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }
}

fn ana() -> Identity {
    Identity::new("a@x.com").with_name("Ana")
}

fn carla() -> Identity {
    Identity::new("c@x.com").with_name("Carla")
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_list_tasks() {
    let app = TestApp::new();
    let ana = ana();

    app.create_task(&ana, "first", false).await;
    app.create_task(&ana, "second", true).await;
    app.create_task(&carla(), "not mine", true).await;

    let (status, body) = app.post("/api/task/list", Some(&ana), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|task| task["owner"] == "a@x.com"));
}

#[tokio::test]
async fn test_anonymous_requests_are_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/task/create", None, json!({ "body": "Buy milk" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"]["message"].is_string());

    let request = app.get("/api/auth/me", None);
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_anonymous() {
    let app = TestApp::new();
    let request = Request::get("/api/auth/me")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_user() {
    let app = TestApp::new();
    let request = app.get("/api/auth/me", Some(&ana()));

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "Ana");
}

#[tokio::test]
async fn test_empty_body_is_bad_request() {
    let app = TestApp::new();

    let (status, _) = app
        .post("/api/task/create", Some(&ana()), json!({ "body": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.state.tasks.count_tasks().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_requires_owner() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "Buy milk", true).await;

    let (status, _) = app
        .post("/api/task/delete", Some(&carla()), json!({ "task_id": task_id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/api/task/delete", Some(&ana()), json!({ "task_id": task_id }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/api/task/delete", Some(&ana()), json!({ "task_id": task_id }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_share_link() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "Buy milk", true).await;

    let (status, body) = app
        .post("/api/task/share", Some(&ana()), json!({ "task_id": task_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], format!("https://tarefas.test/task/{task_id}"));

    let private_id = app.create_task(&ana(), "hidden", false).await;
    let (status, _) = app
        .post("/api/task/share", Some(&ana()), json!({ "task_id": private_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_private_task_page_redirects_home() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "hidden", false).await;

    for path in [format!("/task/{task_id}"), "/task/missing".to_string()] {
        let response = app
            .router
            .clone()
            .oneshot(app.get(&path, Some(&ana())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }
}

#[tokio::test]
async fn test_dashboard_redirects_anonymous() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(app.get("/dashboard", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    app.create_task(&ana(), "Buy milk", false).await;
    let (status, body) = app.send(app.get("/dashboard", Some(&ana()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_comment_thread() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "Buy milk", true).await;

    let (status, body) = app
        .post(
            "/api/comment/create",
            Some(&carla()),
            json!({ "task_id": task_id, "body": "nice!" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comment"]["author"], "c@x.com");
    assert_eq!(body["comment"]["author_display_name"], "Carla");
    let comment_id = body["comment"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.send(app.get(&format!("/task/{task_id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["can_comment"], false);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .post("/api/comment/delete", Some(&ana()), json!({ "comment_id": comment_id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/api/comment/delete", Some(&carla()), json!({ "comment_id": comment_id }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post("/api/comment/list", None, json!({ "task_id": task_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_on_private_task_is_not_found() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "hidden", false).await;

    let (status, _) = app
        .post(
            "/api/comment/create",
            Some(&carla()),
            json!({ "task_id": task_id, "body": "nice!" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.comments.count_comments().await.unwrap(), 0);
}

#[tokio::test]
async fn test_home_counts() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "Buy milk", true).await;
    app.create_task(&ana(), "hidden", false).await;
    app.post(
        "/api/comment/create",
        Some(&carla()),
        json!({ "task_id": task_id, "body": "nice!" }),
    )
    .await;

    let (status, body) = app.send(app.get("/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"], 2);
    assert_eq!(body["comments"], 1);
}

#[tokio::test]
async fn test_watch_streams_task_list() {
    let app = TestApp::new();
    let mut events = TaskEvents::open(&app, &ana()).await;

    let tasks = timeout(WAIT, events.next()).await.unwrap();
    assert!(tasks.is_empty());

    let task_id = app.create_task(&ana(), "Buy milk", false).await;

    let tasks = timeout(WAIT, events.next()).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], task_id.as_str());
    assert_eq!(tasks[0]["body"], "Buy milk");
}

#[tokio::test]
async fn test_watch_ignores_other_owners() {
    let app = TestApp::new();
    let mut events = TaskEvents::open(&app, &ana()).await;
    assert!(timeout(WAIT, events.next()).await.unwrap().is_empty());

    app.create_task(&carla(), "not mine", true).await;
    assert!(timeout(Duration::from_millis(100), events.next()).await.is_err());

    app.create_task(&ana(), "mine", true).await;
    let tasks = timeout(WAIT, events.next()).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["owner"], "a@x.com");
}

#[tokio::test]
async fn test_watch_requires_session() {
    let app = TestApp::new();

    let (status, _) = app.send(app.get("/api/task/watch", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_visibility() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "Buy milk", false).await;
    let page = format!("/task/{task_id}");

    let response = app.router.clone().oneshot(app.get(&page, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let (status, _) = app
        .post(
            "/api/task/update-visibility",
            Some(&carla()),
            json!({ "task_id": task_id, "is_public": true }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            "/api/task/update-visibility",
            Some(&ana()),
            json!({ "task_id": task_id, "is_public": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["is_public"], true);

    let (status, body) = app.send(app.get(&page, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["id"], task_id.as_str());
}

#[tokio::test]
async fn test_nameless_identity_cannot_comment() {
    let app = TestApp::new();
    let task_id = app.create_task(&ana(), "Buy milk", true).await;
    let nameless = Identity::new("c@x.com");

    let (status, _) = app
        .post(
            "/api/comment/create",
            Some(&nameless),
            json!({ "task_id": task_id, "body": "nice!" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.send(app.get(&format!("/task/{task_id}"), Some(&nameless))).await;
    assert_eq!(body["can_comment"], false);
    assert!(body["comments"].as_array().unwrap().is_empty());
}
