mod error;
pub mod mpesa;

pub use self::error::GatewayError;
pub use self::mpesa::{MpesaClient, StkPushReceipt};
