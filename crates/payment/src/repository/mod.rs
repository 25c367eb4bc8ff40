mod command;
mod query;

pub use self::command::PaymentCommandRepository;
pub use self::query::PaymentQueryRepository;
