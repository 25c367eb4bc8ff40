mod mapping;
mod status;

pub use self::mapping::{EnumMapping, EnumMappingError, verify_mapping};
pub use self::status::{OrderStatus, PaymentMethod, PaymentStatus, verify_enum_mappings};

pub const CURRENCY_KES: &str = "KES";
