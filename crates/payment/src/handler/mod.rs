mod callback;
mod payment;

pub use self::callback::{ApiDoc, callback_router};
pub use self::payment::PaymentGrpcServiceImpl;
