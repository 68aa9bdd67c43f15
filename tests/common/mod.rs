//! In-process fake of the IdeaCenter API, served by axum on a random port.

pub mod releases;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Json, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use serde_json::{Value, json};

pub const EMAIL: &str = "tester@example.com";
pub const PASSWORD: &str = "123456";
pub const TOKEN: &str = "fake.jwt.token";

#[derive(Debug, Clone)]
pub struct FakeOptions {
    /// Answer a successful login with a blank `accessToken`.
    pub blank_token: bool,
    /// Keep created ideas so that listing returns them.
    pub persist_creates: bool,
}

impl Default for FakeOptions {
    fn default() -> Self {
        Self {
            blank_token: false,
            persist_creates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIdea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub ideas: Vec<StoredIdea>,
    pub next_id: u64,
    pub login_calls: usize,
    pub idea_calls: usize,
    pub deleted: Vec<String>,
    /// Ids answered with "There is no such idea!", in request order.
    pub rejected_ids: Vec<String>,
    options: FakeOptions,
}

pub type SharedState = Arc<Mutex<FakeState>>;

pub struct FakeServer {
    pub base_url: String,
    pub state: SharedState,
}

impl FakeServer {
    pub fn login_calls(&self) -> usize {
        self.state.lock().unwrap().login_calls
    }

    pub fn idea_calls(&self) -> usize {
        self.state.lock().unwrap().idea_calls
    }

    pub fn ideas(&self) -> Vec<StoredIdea> {
        self.state.lock().unwrap().ideas.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn rejected_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().rejected_ids.clone()
    }

    pub fn seed(&self, title: &str) -> String {
        let mut state = self.state.lock().unwrap();
        insert_idea(&mut state, title, "seeded", "")
    }
}

pub async fn spawn_fake_api(options: FakeOptions) -> FakeServer {
    let state: SharedState = Arc::new(Mutex::new(FakeState {
        next_id: 1000,
        options,
        ..Default::default()
    }));

    let app = Router::new()
        .route("/api/User/Authentication", post(authenticate))
        .route("/api/Idea/Create", post(create_idea))
        .route("/api/Idea/All", get(list_ideas))
        .route("/api/Idea/Edit", put(edit_idea))
        .route("/api/Idea/Delete", delete(delete_idea))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake API");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn insert_idea(state: &mut FakeState, title: &str, description: &str, url: &str) -> String {
    state.next_id += 1;
    let id = format!("idea-{}", state.next_id);
    state.ideas.push(StoredIdea {
        id: id.clone(),
        title: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
    });
    id
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

fn no_such_idea() -> Response {
    (StatusCode::BAD_REQUEST, "\"There is no such idea!\"").into_response()
}

fn text_field<'a>(body: &'a Value, field: &str) -> &'a str {
    body.get(field).and_then(Value::as_str).unwrap_or_default()
}

async fn authenticate(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.login_calls += 1;

    if text_field(&body, "email") != EMAIL || text_field(&body, "password") != PASSWORD {
        return (StatusCode::UNAUTHORIZED, "Invalid email or password").into_response();
    }

    let token = if state.options.blank_token { "" } else { TOKEN };
    Json(json!({ "accessToken": token })).into_response()
}

async fn create_idea(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.idea_calls += 1;
    if !authorized(&headers) {
        return unauthorized();
    }

    let title = text_field(&body, "title");
    let description = text_field(&body, "description");
    if title.trim().is_empty() || description.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "Title": ["The Title field is required."] } })),
        )
            .into_response();
    }

    if state.options.persist_creates {
        insert_idea(&mut state, title, description, text_field(&body, "url"));
    }
    Json(json!({ "msg": "Successfully created!" })).into_response()
}

async fn list_ideas(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.idea_calls += 1;
    if !authorized(&headers) {
        return unauthorized();
    }

    let ideas: Vec<Value> = state
        .ideas
        .iter()
        .map(|idea| {
            json!({
                "id": idea.id,
                "title": idea.title,
                "description": idea.description,
                "url": idea.url,
            })
        })
        .collect();
    Json(Value::Array(ideas)).into_response()
}

async fn edit_idea(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.idea_calls += 1;
    if !authorized(&headers) {
        return unauthorized();
    }

    let id = query.get("ideaId").cloned().unwrap_or_default();
    let Some(position) = state.ideas.iter().position(|idea| idea.id == id) else {
        state.rejected_ids.push(id);
        return no_such_idea();
    };
    let idea = &mut state.ideas[position];

    idea.title = text_field(&body, "title").to_string();
    idea.description = text_field(&body, "description").to_string();
    idea.url = text_field(&body, "url").to_string();
    Json(json!({ "msg": "Edited successfully" })).into_response()
}

async fn delete_idea(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.idea_calls += 1;
    if !authorized(&headers) {
        return unauthorized();
    }

    let id = query.get("ideaId").cloned().unwrap_or_default();
    let Some(position) = state.ideas.iter().position(|idea| idea.id == id) else {
        state.rejected_ids.push(id);
        return no_such_idea();
    };

    state.ideas.remove(position);
    state.deleted.push(id);
    Json(json!("The idea is deleted!")).into_response()
}
