use crate::domain::{ClientCommand, GameChannel, GameConnector, GameError, ServerEvent, Session};
use tracing::{debug, error, info, warn};

/// How a single simulated game ended. Used for logging and tests only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Finished { inputs_sent: u64 },
    Failed,
}

/// Plays one scripted game for `user_id`: join, answer each state push, stop on game over.
///
/// Errors never escape; they are logged with the user id and end this user's run.
/// The connection, once opened, is closed exactly once on every exit path.
pub async fn play<C>(user_id: usize, session: Session, connector: &C) -> PlayOutcome
where
    C: GameConnector + ?Sized,
{
    let mut channel = match connector.connect(&session).await {
        Ok(channel) => channel,
        Err(e) => {
            error!(user_id, error = %e, "websocket error");
            return PlayOutcome::Failed;
        }
    };
    debug!(user_id, "websocket connected");

    let result = run_script(&mut *channel).await;
    channel.close().await;

    match result {
        Ok(inputs_sent) => {
            info!(user_id, inputs_sent, "game finished");
            PlayOutcome::Finished { inputs_sent }
        }
        Err(e) => {
            error!(user_id, error = %e, "websocket error");
            PlayOutcome::Failed
        }
    }
}

async fn run_script(channel: &mut dyn GameChannel) -> Result<u64, GameError> {
    channel.send(ClientCommand::JoinNormal).await?;
    debug!("join_normal sent");

    let mut inputs_sent = 0;
    loop {
        match channel.recv().await? {
            ServerEvent::GameState => {
                // One input per state push, before the next receive.
                channel.send(ClientCommand::press_up()).await?;
                inputs_sent += 1;
            }
            ServerEvent::GameOver { final_score } => {
                match final_score {
                    Some(score) => info!(left = score.left, right = score.right, "game over"),
                    None => info!("game over"),
                }
                return Ok(inputs_sent);
            }
            ServerEvent::Error { message } => {
                warn!(
                    message = message.as_deref().unwrap_or(""),
                    "server reported error"
                );
            }
            ServerEvent::Other(kind) => {
                debug!(kind = %kind, "ignoring server message");
            }
        }
    }
}
