use shared::errors::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unparsable provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Provider rejected the request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("Provider response is missing {0}")]
    MissingField(&'static str),
}

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        ServiceError::Gateway(err.to_string())
    }
}
