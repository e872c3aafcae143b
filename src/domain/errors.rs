use std::fmt;

// Domain-level errors for the auth and game phases of a simulated user.

#[derive(Debug)]
pub enum AuthError {
    // Request never produced a response (DNS, TLS, connection refused, ...).
    Transport(String),
    // Non-2xx response; status and raw body are kept for the log line.
    Rejected { status: u16, body: String },
    // 2xx response that carried no session cookie (e.g. a 2FA challenge).
    MissingSession { status: u16 },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Transport(err) => write!(f, "auth transport error: {err}"),
            AuthError::Rejected { status, body } => {
                if body.is_empty() {
                    write!(f, "auth rejected with status {status}")
                } else {
                    write!(f, "auth rejected with status {status}: {body}")
                }
            }
            AuthError::MissingSession { status } => {
                write!(f, "auth returned status {status} without a session cookie")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    /// HTTP status surfaced by the API, when there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Transport(_) => None,
            AuthError::Rejected { status, .. } | AuthError::MissingSession { status } => {
                Some(*status)
            }
        }
    }
}

#[derive(Debug)]
pub enum GameError {
    // Session could not be turned into a request header.
    InvalidSession(String),
    Connect(String),
    Transport(String),
    Encode(String),
    Decode(String),
    ClosedBeforeGameOver,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidSession(err) => write!(f, "invalid session cookie: {err}"),
            GameError::Connect(err) => write!(f, "websocket connect failed: {err}"),
            GameError::Transport(err) => write!(f, "websocket transport error: {err}"),
            GameError::Encode(err) => write!(f, "failed to encode client message: {err}"),
            GameError::Decode(err) => write!(f, "failed to decode server message: {err}"),
            GameError::ClosedBeforeGameOver => {
                write!(f, "connection closed before game over")
            }
        }
    }
}

impl std::error::Error for GameError {}
