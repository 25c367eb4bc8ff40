use anyhow::Result;
use shared::config::env;
use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://sandbox.safaricom.co.ke";
pub const DEFAULT_SHORT_CODE: &str = "174379";

#[derive(Clone)]
pub struct MpesaConfig {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub passkey: String,
    pub short_code: String,
    pub callback_base_url: String,
}

impl fmt::Debug for MpesaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MpesaConfig")
            .field("base_url", &self.base_url)
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("passkey", &"<redacted>")
            .field("short_code", &self.short_code)
            .field("callback_base_url", &self.callback_base_url)
            .finish()
    }
}

impl MpesaConfig {
    pub fn init() -> Result<Self> {
        Ok(Self {
            base_url: env::parsed_or("MPESA_BASE_URL", DEFAULT_BASE_URL.to_string())?,
            consumer_key: env::required("MPESA_CONSUMER_KEY")?,
            consumer_secret: env::required("MPESA_CONSUMER_SECRET")?,
            passkey: env::required("MPESA_PASSKEY")?,
            short_code: env::parsed_or("MPESA_SHORT_CODE", DEFAULT_SHORT_CODE.to_string())?,
            callback_base_url: env::required("CALLBACK_BASEURL")?,
        })
    }

    pub fn callback_url(&self) -> String {
        format!("{}/callback", self.callback_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(callback_base_url: &str) -> MpesaConfig {
        MpesaConfig {
            base_url: DEFAULT_BASE_URL.into(),
            consumer_key: "key".into(),
            consumer_secret: "cs-value".into(),
            passkey: "pk-value".into(),
            short_code: DEFAULT_SHORT_CODE.into(),
            callback_base_url: callback_base_url.into(),
        }
    }

    #[test]
    fn callback_url_appends_route_once() {
        assert_eq!(
            config("https://shop.example.com").callback_url(),
            "https://shop.example.com/callback"
        );
        assert_eq!(
            config("https://shop.example.com/").callback_url(),
            "https://shop.example.com/callback"
        );
    }

    #[test]
    fn debug_output_hides_credentials() {
        let rendered = format!("{:?}", config("https://shop.example.com"));
        assert!(!rendered.contains("cs-value"));
        assert!(!rendered.contains("pk-value"));
        assert!(rendered.contains("174379"));
    }
}
