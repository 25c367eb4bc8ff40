mod database;
pub mod env;

pub use self::database::{ConnectionManager, ConnectionPool};
