// In-process mock of the user API and game socket, bound to an ephemeral port per test.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::sync::Barrier;

pub const PASSWORD: &str = "Testpass123";
// Accounts with this email get the 2FA challenge instead of a cookie.
pub const TWO_FACTOR_EMAIL: &str = "2fa@test.com";

#[derive(Clone, Default)]
pub struct MockGame {
    // Number of game_state pushes before game_over.
    pub states_before_game_over: usize,
    // When set, each socket waits here after join so tests can assert concurrency.
    pub gate: Option<Arc<Barrier>>,
    // When set, these frames are sent verbatim after join instead of the normal game.
    pub frames: Option<Vec<Message>>,
}

#[derive(Default)]
pub struct MockStats {
    pub logins: AtomicUsize,
    pub registrations: AtomicUsize,
    pub joins: AtomicUsize,
    pub inputs: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub closes_seen: AtomicUsize,
    pub rejected_sockets: AtomicUsize,
}

impl MockStats {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct MockState {
    game: MockGame,
    stats: Arc<MockStats>,
    tokens: Arc<Mutex<HashSet<String>>>,
}

pub struct MockServer {
    pub api_url: String,
    pub ws_url: String,
    pub stats: Arc<MockStats>,
}

pub async fn spawn_mock_server(game: MockGame) -> MockServer {
    let stats = Arc::new(MockStats::default());
    let state = MockState {
        game,
        stats: Arc::clone(&stats),
        tokens: Arc::new(Mutex::new(HashSet::new())),
    };

    let app = Router::new()
        .route("/api/user/login", post(login))
        .route("/api/user/register", post(register))
        .route("/api/game/ws", get(game_ws))
        .with_state(state);

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server failed");
    });

    MockServer {
        api_url: format!("http://{addr}/api/user"),
        ws_url: format!("ws://{addr}/api/game/ws"),
        stats,
    }
}

/// Polls `condition` for up to two seconds; server-side bookkeeping can trail the client.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

fn issue_session(state: &MockState, email: &str) -> Response {
    let token = format!("{}-{}", email.replace('@', "."), uuid::Uuid::new_v4());
    state
        .tokens
        .lock()
        .expect("tokens mutex poisoned")
        .insert(token.clone());
    (
        [(
            header::SET_COOKIE,
            format!("token={token}; Path=/; HttpOnly"),
        )],
        Json(json!({ "user": { "email": email } })),
    )
        .into_response()
}

async fn login(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.stats.logins.fetch_add(1, Ordering::SeqCst);
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }
    if email == TWO_FACTOR_EMAIL {
        return (
            StatusCode::ACCEPTED,
            Json(json!({ "needsTwoFA": true, "email": email })),
        )
            .into_response();
    }
    issue_session(&state, email)
}

async fn register(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.stats.registrations.fetch_add(1, Ordering::SeqCst);
    let email = body["email"].as_str().unwrap_or_default();
    if body["username"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "username is required" })),
        )
            .into_response();
    }
    issue_session(&state, email)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("token="))
        .map(str::to_string)
}

async fn game_ws(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<MockState>,
) -> Response {
    let known = session_token(&headers).is_some_and(|token| {
        state
            .tokens
            .lock()
            .expect("tokens mutex poisoned")
            .contains(&token)
    });
    if !known {
        state.stats.rejected_sockets.fetch_add(1, Ordering::SeqCst);
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid token" })),
        )
            .into_response();
    }

    ws.on_upgrade(move |socket| play_scripted_game(socket, state))
}

async fn next_type(socket: &mut WebSocket, stats: &MockStats) -> Option<String> {
    loop {
        match socket.recv().await? {
            Ok(Message::Text(text)) => {
                let value: Value = serde_json::from_str(text.as_str()).ok()?;
                return value["type"].as_str().map(str::to_string);
            }
            Ok(Message::Close(_)) => {
                stats.closes_seen.fetch_add(1, Ordering::SeqCst);
                return None;
            }
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
}

async fn send_json(socket: &mut WebSocket, value: Value) -> bool {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .is_ok()
}

async fn play_scripted_game(mut socket: WebSocket, state: MockState) {
    let stats = &state.stats;
    let active = stats.active.fetch_add(1, Ordering::SeqCst) + 1;
    stats.max_active.fetch_max(active, Ordering::SeqCst);

    if next_type(&mut socket, stats).await.as_deref() == Some("join_normal") {
        stats.joins.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &state.game.gate {
            gate.wait().await;
        }

        match &state.game.frames {
            Some(frames) => {
                for frame in frames.iter().cloned() {
                    if socket.send(frame).await.is_err() {
                        break;
                    }
                }
            }
            None => push_game(&mut socket, &state.game, stats).await,
        }

        // Drain until the client closes; count any stray inputs.
        while let Some(kind) = next_type(&mut socket, stats).await {
            if kind == "input" {
                stats.inputs.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    stats.active.fetch_sub(1, Ordering::SeqCst);
}

async fn push_game(socket: &mut WebSocket, game: &MockGame, stats: &MockStats) {
    let queued = json!({ "type": "queue_joined", "position": 1 });
    let _ = send_json(socket, queued).await;
    for tick in 0..game.states_before_game_over {
        let state_push = json!({
            "type": "game_state",
            "state": { "score": { "left": 0, "right": tick } }
        });
        if !send_json(socket, state_push).await {
            return;
        }
        // Wait for the reply before pushing the next state.
        if next_type(socket, stats).await.as_deref() == Some("input") {
            stats.inputs.fetch_add(1, Ordering::SeqCst);
        }
    }

    let game_over = json!({
        "type": "game_over",
        "finalScore": { "left": 11, "right": 4 },
        "mode": "normal"
    });
    let _ = send_json(socket, game_over).await;
}
