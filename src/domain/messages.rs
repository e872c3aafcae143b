// Game message model as seen by the scripted player.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Press,
}

/// Commands the tester sends to the game service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    // Enter the normal (non-tournament) matchmaking queue.
    JoinNormal,
    Input { key: InputKey, action: InputAction },
}

impl ClientCommand {
    /// The scripted reply to every game state push.
    pub fn press_up() -> Self {
        ClientCommand::Input {
            key: InputKey::Up,
            action: InputAction::Press,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub left: i64,
    pub right: i64,
}

/// Server pushes, reduced to what the tester reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    GameState,
    GameOver { final_score: Option<FinalScore> },
    Error { message: Option<String> },
    // Any other message type (queue_joined, countdown, ball_sync, ...).
    Other(String),
}
