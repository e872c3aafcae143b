// Interface adapters: wire protocol and the HTTP/WebSocket clients.

pub mod clients;
pub mod protocol;
