// Wire protocol DTOs and conversions for the game WebSocket.
// Only the `type` field is required on inbound frames; everything else is best-effort.

use crate::domain::{ClientCommand, FinalScore, InputAction, InputKey, ServerEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages the tester sends to the game service.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinNormal,
    Input {
        key: InputKeyDto,
        action: InputActionDto,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKeyDto {
    Up,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputActionDto {
    Press,
}

impl From<ClientCommand> for ClientMessage {
    fn from(command: ClientCommand) -> Self {
        match command {
            ClientCommand::JoinNormal => ClientMessage::JoinNormal,
            ClientCommand::Input { key, action } => ClientMessage::Input {
                key: match key {
                    InputKey::Up => InputKeyDto::Up,
                },
                action: match action {
                    InputAction::Press => InputActionDto::Press,
                },
            },
        }
    }
}

/// Loose view of any server push: the type tag plus the fields we log.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default, rename = "finalScore")]
    pub final_score: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct FinalScoreDto {
    left: i64,
    right: i64,
}

impl From<ServerEnvelope> for ServerEvent {
    fn from(envelope: ServerEnvelope) -> Self {
        match envelope.kind.as_str() {
            "game_state" => ServerEvent::GameState,
            "game_over" => ServerEvent::GameOver {
                final_score: envelope
                    .final_score
                    .and_then(|value| serde_json::from_value::<FinalScoreDto>(value).ok())
                    .map(|score| FinalScore {
                        left: score.left,
                        right: score.right,
                    }),
            },
            "error" => ServerEvent::Error {
                message: envelope
                    .message
                    .as_ref()
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            _ => ServerEvent::Other(envelope.kind),
        }
    }
}

pub fn encode_client_message(command: ClientCommand) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ClientMessage::from(command))
}

pub fn decode_server_message(bytes: &[u8]) -> Result<ServerEvent, serde_json::Error> {
    serde_json::from_slice::<ServerEnvelope>(bytes).map(ServerEvent::from)
}
