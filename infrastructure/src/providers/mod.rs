//! Chat-completion provider adapters
//!
//! [`HttpChatGateway`] implements the
//! [`ChatGateway`](duet_application::ChatGateway) port over HTTPS with
//! `reqwest`. Both provider slots share one gateway; endpoint and
//! credential are passed per call.

mod http_gateway;

pub use http_gateway::{HttpChatGateway, HttpGatewayError};
