//! HTTP implementation of the exchange API

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use common::decimal::Amount;
use common::error::{Error, Result};
use common::model::payment::{PaymentDetails, PaymentResult, PaymentStatus};
use common::model::quote::{Quote, QuoteRequest};
use common::model::trade::TradeStatus;
use common::model::wallet::{Balance, WithdrawalRequest};

use crate::api::{ExchangeApi, SwapConfirmation};
use crate::config::ExchangeConfig;

/// Response envelope used by every exchange endpoint
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Serialize)]
struct ConfirmRequest {
    user_id: Uuid,
    quote_id: Uuid,
}

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    user_id: Uuid,
    currency: &'a str,
    amount: Amount,
    reference: &'a str,
}

#[derive(Debug, Deserialize)]
struct AddressData {
    address: String,
}

#[derive(Debug, Deserialize)]
struct WithdrawalData {
    reference: String,
}

#[derive(Debug, Deserialize)]
struct StatusData {
    status: TradeStatus,
}

#[derive(Debug, Deserialize)]
struct PaymentResultData {
    success: bool,
    reference: String,
    status: PaymentStatus,
    redirect_url: Option<String>,
    #[serde(default)]
    metadata: Value,
}

impl From<PaymentResultData> for PaymentResult {
    fn from(data: PaymentResultData) -> Self {
        PaymentResult {
            success: data.success,
            reference: data.reference,
            status: data.status,
            redirect_url: data.redirect_url,
            metadata: data.metadata,
        }
    }
}

/// REST client for the hosted exchange
///
/// Every request carries the configured bearer token and an explicit
/// timeout, so a hung upstream cannot stall a flow indefinitely.
pub struct HttpExchangeClient {
    http: Client,
    config: ExchangeConfig,
}

impl HttpExchangeClient {
    /// Create a new client from a configuration
    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.config.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config.api_key)
        }
    }

    /// Unwrap the exchange's response envelope, mapping failures to errors
    async fn parse<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ExchangeRejected(format!("{}: {}", status, body)));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if envelope.status != "success" {
            return Err(Error::ExchangeRejected(
                envelope.message.unwrap_or_else(|| "request rejected".to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| Error::ExchangeRejected("response data missing".to_string()))
    }
}

#[async_trait]
impl ExchangeApi for HttpExchangeClient {
    async fn create_quote(&self, request: &QuoteRequest) -> Result<Quote> {
        debug!(
            "Requesting quote: {} {} -> {}",
            request.from_amount, request.from_currency, request.to_currency
        );

        let response = self
            .authorized(self.http.post(self.url("/quote")))
            .json(request)
            .send()
            .await?;

        self.parse(response).await
    }

    async fn confirm_quote(&self, user_id: Uuid, quote_id: Uuid) -> Result<SwapConfirmation> {
        debug!("Confirming quote {} for user {}", quote_id, user_id);

        let response = self
            .authorized(self.http.post(self.url("/confirm")))
            .json(&ConfirmRequest { user_id, quote_id })
            .send()
            .await?;

        self.parse(response).await
    }

    async fn get_balance(&self, user_id: Uuid, currency: &str) -> Result<Balance> {
        let response = self
            .authorized(self.http.get(self.url("/wallet/balance")))
            .query(&[("user_id", user_id.to_string()), ("currency", currency.to_string())])
            .send()
            .await?;

        self.parse(response).await
    }

    async fn get_deposit_address(&self, user_id: Uuid, currency: &str) -> Result<String> {
        let response = self
            .authorized(self.http.get(self.url("/wallet/address")))
            .query(&[("user_id", user_id.to_string()), ("currency", currency.to_string())])
            .send()
            .await?;

        let data: AddressData = self.parse(response).await?;
        Ok(data.address)
    }

    async fn withdraw(&self, request: &WithdrawalRequest) -> Result<String> {
        debug!(
            "Submitting withdrawal of {} {} for user {}",
            request.amount, request.currency, request.user_id
        );

        let response = self
            .authorized(self.http.post(self.url("/wallet/withdraw")))
            .json(request)
            .send()
            .await?;

        let data: WithdrawalData = self.parse(response).await?;
        Ok(data.reference)
    }

    async fn transfer(
        &self,
        user_id: Uuid,
        currency: &str,
        amount: Amount,
        reference: &str,
    ) -> Result<PaymentResult> {
        debug!("Transferring {} {} for user {}", amount, currency, user_id);

        let response = self
            .authorized(self.http.post(self.url("/wallet/transfer")))
            .json(&TransferRequest {
                user_id,
                currency,
                amount,
                reference,
            })
            .send()
            .await?;

        let data: PaymentResultData = self.parse(response).await?;
        Ok(data.into())
    }

    async fn bank_transfer_details(&self, details: &PaymentDetails) -> Result<PaymentResult> {
        let response = self
            .authorized(self.http.post(self.url("/payments/bank_transfer")))
            .json(details)
            .send()
            .await?;

        let data: PaymentResultData = self.parse(response).await?;
        Ok(data.into())
    }

    async fn verify_payment(&self, reference: &str) -> Result<PaymentResult> {
        let response = self
            .authorized(self.http.get(self.url("/payments/verify")))
            .query(&[("reference", reference)])
            .send()
            .await?;

        let data: PaymentResultData = self.parse(response).await?;
        Ok(data.into())
    }

    async fn trade_status(&self, trade_id: Uuid) -> Result<TradeStatus> {
        let response = self
            .authorized(self.http.get(self.url("/trades/status")))
            .query(&[("tradeId", trade_id.to_string())])
            .send()
            .await?;

        let data: StatusData = self.parse(response).await?;
        Ok(data.status)
    }
}
