use crate::{abstract_trait::PaymentGatewayTrait, config::MpesaConfig, gateway::GatewayError};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{error, info};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_ENDPOINT: &str = "oauth/v1/generate";
const STK_PUSH_ENDPOINT: &str = "mpesa/stkpush/v1/processrequest";
const TRANSACTION_TYPE: &str = "CustomerPayBillOnline";

#[derive(Debug, Default, Deserialize)]
pub struct AccessTokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub expires_in: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StkPushRequestBody {
    pub business_short_code: String,
    pub password: String,
    pub timestamp: String,
    pub transaction_type: String,
    pub amount: i64,
    #[serde(rename = "PartyA")]
    pub party_a: String,
    #[serde(rename = "PartyB")]
    pub party_b: String,
    pub phone_number: String,
    #[serde(rename = "CallBackURL")]
    pub callback_url: String,
    pub account_reference: String,
    pub transaction_desc: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StkPushResponse {
    #[serde(rename = "MerchantRequestID", default)]
    pub merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID", default)]
    pub checkout_request_id: String,
    #[serde(rename = "ResponseCode", default)]
    pub response_code: String,
    #[serde(rename = "ResponseDescription", default)]
    pub response_description: String,
    #[serde(rename = "CustomerMessage", default)]
    pub customer_message: String,
    #[serde(rename = "requestId", default)]
    pub request_id: String,
    #[serde(rename = "errorCode", default)]
    pub error_code: String,
    #[serde(rename = "errorMessage", default)]
    pub error_message: String,
}

/// Correlation ids handed out by the provider for an accepted push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StkPushReceipt {
    pub merchant_request_id: String,
    pub checkout_request_id: String,
}

impl TryFrom<StkPushResponse> for StkPushReceipt {
    type Error = GatewayError;

    fn try_from(value: StkPushResponse) -> Result<Self, Self::Error> {
        if !value.error_code.is_empty() && value.error_code != "0" {
            return Err(GatewayError::Rejected {
                code: value.error_code,
                message: value.error_message,
            });
        }

        if value.merchant_request_id.is_empty() {
            return Err(GatewayError::MissingField("MerchantRequestID"));
        }

        Ok(Self {
            merchant_request_id: value.merchant_request_id,
            checkout_request_id: value.checkout_request_id,
        })
    }
}

pub fn stk_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}

pub fn stk_password(short_code: &str, passkey: &str, timestamp: &str) -> String {
    STANDARD.encode(format!("{short_code}{passkey}{timestamp}"))
}

pub fn normalize_phone(phone: &str) -> String {
    phone.trim().trim_start_matches('+').to_string()
}

#[derive(Clone)]
pub struct MpesaClient {
    config: MpesaConfig,
    http: Client,
}

impl MpesaClient {
    pub fn new(config: MpesaConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { config, http })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("❌ M-Pesa {endpoint} returned {status}: {body}");
            return Err(GatewayError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn generate_access_token(&self) -> Result<String, GatewayError> {
        let url = format!(
            "{}?grant_type=client_credentials",
            self.url(TOKEN_ENDPOINT)
        );

        let response = self
            .http
            .get(url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await?;

        let token: AccessTokenResponse = Self::read_json(TOKEN_ENDPOINT, response).await?;

        if token.access_token.is_empty() {
            return Err(GatewayError::MissingField("access_token"));
        }

        Ok(token.access_token)
    }

    pub fn build_stk_push(
        &self,
        order_id: &str,
        phone: &str,
        amount: f64,
        now: DateTime<Utc>,
    ) -> StkPushRequestBody {
        let timestamp = stk_timestamp(now);
        let phone = normalize_phone(phone);

        StkPushRequestBody {
            business_short_code: self.config.short_code.clone(),
            password: stk_password(&self.config.short_code, &self.config.passkey, &timestamp),
            timestamp,
            transaction_type: TRANSACTION_TYPE.to_string(),
            amount: amount.ceil() as i64,
            party_a: phone.clone(),
            party_b: self.config.short_code.clone(),
            phone_number: phone,
            callback_url: self.config.callback_url(),
            account_reference: order_id.to_string(),
            transaction_desc: format!("Payment for order {order_id}"),
        }
    }

    pub async fn send_stk_push(
        &self,
        body: &StkPushRequestBody,
    ) -> Result<StkPushReceipt, GatewayError> {
        let token = self.generate_access_token().await?;

        let response = self
            .http
            .post(self.url(STK_PUSH_ENDPOINT))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let parsed: StkPushResponse = Self::read_json(STK_PUSH_ENDPOINT, response).await?;
        let receipt = StkPushReceipt::try_from(parsed)?;

        info!(
            "✅ STK push accepted for {}: merchant_request_id={}",
            body.account_reference, receipt.merchant_request_id
        );

        Ok(receipt)
    }
}

#[async_trait]
impl PaymentGatewayTrait for MpesaClient {
    async fn initiate_stk_push(
        &self,
        order_id: &str,
        phone: &str,
        amount: f64,
    ) -> Result<StkPushReceipt, GatewayError> {
        let body = self.build_stk_push(order_id, phone, amount, Utc::now());
        self.send_stk_push(&body).await
    }
}
