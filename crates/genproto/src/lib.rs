pub mod order {
    include!("gen/order.rs");
}

pub mod payment {
    include!("gen/payment.rs");
}
