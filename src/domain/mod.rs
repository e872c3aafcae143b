// Domain layer: sessions, message model, errors and the ports the use cases depend on.

pub mod errors;
pub mod messages;
pub mod ports;
pub mod session;

pub use errors::{AuthError, GameError};
pub use messages::{ClientCommand, FinalScore, InputAction, InputKey, ServerEvent};
pub use ports::{AuthProvider, GameChannel, GameConnector};
pub use session::{Credentials, Session};
