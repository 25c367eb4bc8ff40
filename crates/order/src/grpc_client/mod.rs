mod payment;

pub use self::payment::PaymentGrpcClientService;

use anyhow::{Context, Result};
use genproto::payment::payment_service_client::PaymentServiceClient;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Covers the payment service's worst case: a 30s token exchange followed by
/// a 30s STK push.
const PAYMENT_RPC_TIMEOUT: Duration = Duration::from_secs(75);

#[derive(Clone)]
pub struct GrpcClients {
    pub payment_client: PaymentServiceClient<Channel>,
}

impl GrpcClients {
    pub fn init(payment_addr: &str) -> Result<Self> {
        let endpoint = Endpoint::from_shared(payment_addr.to_string())
            .with_context(|| format!("Invalid gRPC address for payment-service: {payment_addr}"))?
            .connect_timeout(Duration::from_secs(3))
            .timeout(PAYMENT_RPC_TIMEOUT);

        Ok(Self {
            payment_client: PaymentServiceClient::new(endpoint.connect_lazy()),
        })
    }
}
