mod catalog;
mod order_command;
mod order_query;
mod payment_intent;

pub use self::catalog::{CustomerQueryRepository, ProductQueryRepository};
pub use self::order_command::OrderCommandRepository;
pub use self::order_query::OrderQueryRepository;
pub use self::payment_intent::PaymentIntentRepository;
