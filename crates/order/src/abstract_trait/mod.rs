mod catalog;
mod grpc_client;
pub mod order;
mod payment_intent;

pub use self::catalog::{
    CustomerQueryRepositoryTrait, DynCustomerQueryRepository, DynProductQueryRepository,
    ProductQueryRepositoryTrait,
};
pub use self::grpc_client::{DynPaymentGrpcClient, PaymentGrpcClientTrait};
pub use self::payment_intent::{DynPaymentIntentRepository, PaymentIntentRepositoryTrait};
