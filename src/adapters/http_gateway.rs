use crate::domain::model::{normalize_card_number, GatewayReply, GatewayStatus, ProductPath};
use crate::domain::ports::Gateway;
use crate::utils::error::{CheckoutError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct AuthorizeRequest<'a> {
    number: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    status: GatewayStatus,
}

/// Talks to an external bank simulator over HTTP.
///
/// Debit requests go to `{endpoint}/payment`, credit requests to
/// `{endpoint}/credit`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    endpoint: String,
    client: Client,
}

impl HttpGateway {
    pub fn new(endpoint: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url_for(&self, path: ProductPath) -> String {
        match path {
            ProductPath::Debit => format!("{}/payment", self.endpoint),
            ProductPath::Credit => format!("{}/credit", self.endpoint),
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn authorize(&self, card_number: &str, path: ProductPath) -> Result<GatewayReply> {
        let number = normalize_card_number(card_number);
        let url = self.url_for(path);

        tracing::debug!("Making gateway request to: {}", url);
        let response = self
            .client
            .post(&url)
            .json(&AuthorizeRequest { number: &number })
            .send()
            .await?;

        tracing::debug!("Gateway response status: {}", response.status());

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                return Err(CheckoutError::UnknownCard { number });
            }
            status => {
                return Err(CheckoutError::GatewayError {
                    message: format!("{} answered {}", url, status),
                });
            }
        }

        let body = response.text().await?;
        let parsed: AuthorizeResponse = serde_json::from_str(&body)?;

        Ok(GatewayReply {
            status: parsed.status,
            bank_id: Uuid::new_v4().to_string(),
        })
    }
}
