pub mod catalog;
pub mod order;
pub mod payment_intent;
