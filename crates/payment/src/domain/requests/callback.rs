use serde::{Deserialize, Serialize};
use shared::utils::{into_result, require_non_empty};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// Result code the provider sends when the customer approved the push.
pub const RESULT_CODE_SUCCESS: i64 = 0;
/// Result code the provider sends when the customer dismissed the prompt.
pub const RESULT_CODE_CANCELLED_BY_USER: i64 = 1032;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StkCallbackEnvelope {
    #[serde(rename = "Body")]
    pub body: StkCallbackBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StkCallbackBody {
    #[serde(rename = "stkCallback")]
    pub stk_callback: StkCallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StkCallback {
    #[serde(rename = "MerchantRequestID")]
    pub merchant_request_id: String,
    #[serde(rename = "CheckoutRequestID")]
    pub checkout_request_id: String,
    #[serde(rename = "ResultCode")]
    pub result_code: i64,
    #[serde(rename = "ResultDesc")]
    pub result_desc: String,
    #[serde(rename = "CallbackMetadata", default)]
    pub callback_metadata: Option<CallbackMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CallbackMetadata {
    #[serde(rename = "Item", default)]
    pub items: Vec<CallbackItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CallbackItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value", default)]
    #[schema(value_type = Object)]
    pub value: Option<serde_json::Value>,
}

impl StkCallback {
    pub fn metadata_value(&self, name: &str) -> Option<&serde_json::Value> {
        self.callback_metadata
            .as_ref()?
            .items
            .iter()
            .find(|item| item.name == name)
            .and_then(|item| item.value.as_ref())
    }

    /// Provider receipt number, only present on successful payments.
    pub fn receipt_number(&self) -> Option<&str> {
        self.metadata_value("MpesaReceiptNumber")
            .and_then(|value| value.as_str())
    }
}

impl Validate for StkCallback {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_empty(&mut errors, "MerchantRequestID", &self.merchant_request_id);
        into_result(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_callback_with_metadata() {
        let raw = r#"{
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": "29115-34620561-1",
                    "CheckoutRequestID": "ws_CO_191220191020363925",
                    "ResultCode": 0,
                    "ResultDesc": "The service request is processed successfully.",
                    "CallbackMetadata": {
                        "Item": [
                            {"Name": "Amount", "Value": 1.00},
                            {"Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV"},
                            {"Name": "Balance"},
                            {"Name": "PhoneNumber", "Value": 254708374149}
                        ]
                    }
                }
            }
        }"#;

        let envelope: StkCallbackEnvelope = serde_json::from_str(raw).unwrap();
        let callback = envelope.body.stk_callback;

        assert_eq!(callback.merchant_request_id, "29115-34620561-1");
        assert_eq!(callback.result_code, RESULT_CODE_SUCCESS);
        assert_eq!(callback.receipt_number(), Some("NLJ7RT61SV"));
        assert!(callback.metadata_value("Balance").is_none());
        assert!(callback.validate().is_ok());
    }

    #[test]
    fn parses_cancellation_without_metadata() {
        let raw = r#"{"Body":{"stkCallback":{"MerchantRequestID":"MR1","CheckoutRequestID":"CR1","ResultCode":1032,"ResultDesc":"Request cancelled by user"}}}"#;

        let envelope: StkCallbackEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(
            envelope.body.stk_callback.result_code,
            RESULT_CODE_CANCELLED_BY_USER
        );
        assert!(envelope.body.stk_callback.receipt_number().is_none());
    }

    #[test]
    fn missing_result_code_is_rejected() {
        let raw = r#"{"Body":{"stkCallback":{"MerchantRequestID":"MR1","CheckoutRequestID":"CR1","ResultDesc":"?"}}}"#;
        assert!(serde_json::from_str::<StkCallbackEnvelope>(raw).is_err());
    }

    #[test]
    fn empty_merchant_request_id_fails_validation() {
        let raw = r#"{"Body":{"stkCallback":{"MerchantRequestID":"","CheckoutRequestID":"CR1","ResultCode":0,"ResultDesc":"ok"}}}"#;
        let envelope: StkCallbackEnvelope = serde_json::from_str(raw).unwrap();
        assert!(envelope.body.stk_callback.validate().is_err());
    }
}
