// Adapters layer: concrete implementations for external systems
// (bank simulator over HTTP, file storage).

pub mod http_gateway;
pub mod storage;

use crate::core::gateway::GatewaySimulator;
use crate::domain::model::{GatewayReply, ProductPath};
use crate::domain::ports::Gateway;
use crate::utils::error::Result;
use async_trait::async_trait;
use http_gateway::HttpGateway;

/// Gateway picked by configuration at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredGateway {
    Simulator(GatewaySimulator),
    Http(HttpGateway),
}

#[async_trait]
impl Gateway for ConfiguredGateway {
    async fn authorize(&self, card_number: &str, path: ProductPath) -> Result<GatewayReply> {
        match self {
            ConfiguredGateway::Simulator(gateway) => gateway.authorize(card_number, path).await,
            ConfiguredGateway::Http(gateway) => gateway.authorize(card_number, path).await,
        }
    }
}
