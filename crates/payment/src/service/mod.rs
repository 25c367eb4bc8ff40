mod callback;
mod command;
mod query;

pub use self::callback::{CallbackService, CallbackServiceDeps};
pub use self::command::{PaymentCommandService, PaymentCommandServiceDeps};
pub use self::query::PaymentQueryService;
