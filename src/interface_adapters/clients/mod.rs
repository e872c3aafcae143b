// reqwest and tokio-tungstenite clients for the user API and the game socket.

pub mod auth;
pub mod game;

pub use auth::AuthClient;
pub use game::{GameClient, TlsMode};
