mod order;

pub use self::order::OrderGrpcServiceImpl;
