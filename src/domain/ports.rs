use async_trait::async_trait;

use crate::domain::errors::{AuthError, GameError};
use crate::domain::messages::{ClientCommand, ServerEvent};
use crate::domain::session::{Credentials, Session};

// Use cases depend on these traits, not on reqwest or tungstenite directly.

// Port for the user API that issues session cookies.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<Session, AuthError>;
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;
}

// Port for opening an authenticated game connection.
#[async_trait]
pub trait GameConnector: Send + Sync {
    async fn connect(&self, session: &Session) -> Result<Box<dyn GameChannel>, GameError>;
}

// One open game connection owned by a single worker.
#[async_trait]
pub trait GameChannel: Send {
    async fn send(&mut self, command: ClientCommand) -> Result<(), GameError>;
    async fn recv(&mut self) -> Result<ServerEvent, GameError>;
    // Best-effort shutdown; called once per connection by the play loop.
    async fn close(&mut self);
}
