use crate::domain::{ClientCommand, GameChannel, GameConnector, GameError, ServerEvent, Session};
use crate::interface_adapters::protocol::{decode_server_message, encode_client_message};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::COOKIE};
use tokio_tungstenite::{
    Connector, MaybeTlsStream, WebSocketStream, connect_async_tls_with_config,
};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    // Certificates and host names are checked (default).
    Verify,
    // Self-signed test deployments only.
    AcceptInvalidCerts,
}

// Opens one cookie-authenticated game socket per call.
#[derive(Clone)]
pub struct GameClient {
    ws_url: String,
    // None uses the library's verifying default for wss:// URLs.
    tls: Option<native_tls::TlsConnector>,
}

impl GameClient {
    pub fn new(ws_url: impl Into<String>, tls_mode: TlsMode) -> Result<Self, native_tls::Error> {
        let tls = match tls_mode {
            TlsMode::Verify => None,
            TlsMode::AcceptInvalidCerts => Some(
                native_tls::TlsConnector::builder()
                    .danger_accept_invalid_certs(true)
                    .danger_accept_invalid_hostnames(true)
                    .build()?,
            ),
        };
        Ok(Self {
            ws_url: ws_url.into(),
            tls,
        })
    }
}

#[async_trait]
impl GameConnector for GameClient {
    async fn connect(&self, session: &Session) -> Result<Box<dyn GameChannel>, GameError> {
        let mut request = self
            .ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| GameError::Connect(e.to_string()))?;

        if !session.is_empty() {
            let cookie = HeaderValue::from_str(&session.cookie_header())
                .map_err(|e| GameError::InvalidSession(e.to_string()))?;
            request.headers_mut().insert(COOKIE, cookie);
        }

        let connector = self.tls.clone().map(Connector::NativeTls);
        let (stream, response) = connect_async_tls_with_config(request, None, false, connector)
            .await
            .map_err(|e| GameError::Connect(e.to_string()))?;
        debug!(status = response.status().as_u16(), "websocket upgraded");

        Ok(Box::new(WsChannel { stream }))
    }
}

struct WsChannel {
    stream: WsStream,
}

#[async_trait]
impl GameChannel for WsChannel {
    async fn send(&mut self, command: ClientCommand) -> Result<(), GameError> {
        let text = encode_client_message(command).map_err(|e| GameError::Encode(e.to_string()))?;
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| GameError::Transport(e.to_string()))
    }

    async fn recv(&mut self) -> Result<ServerEvent, GameError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return decode_server_message(text.as_str().as_bytes())
                        .map_err(|e| GameError::Decode(e.to_string()));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    return decode_server_message(&bytes)
                        .map_err(|e| GameError::Decode(e.to_string()));
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "server closed the connection");
                    return Err(GameError::ClosedBeforeGameOver);
                }
                // Pings are answered by tungstenite while reading.
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Err(e)) => return Err(GameError::Transport(e.to_string())),
                None => return Err(GameError::ClosedBeforeGameOver),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "websocket close did not complete cleanly");
        }
    }
}
