mod callback;
mod gateway;
mod grpc_client;
pub mod payment;

pub use self::callback::{CallbackServiceTrait, DynCallbackService};
pub use self::gateway::{DynPaymentGateway, PaymentGatewayTrait};
pub use self::grpc_client::{DynOrderGrpcClient, OrderGrpcClientTrait};
