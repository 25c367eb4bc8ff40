mod mpesa;
mod myconfig;

pub use self::mpesa::MpesaConfig;
pub use self::myconfig::Config;
