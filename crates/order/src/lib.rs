pub mod abstract_trait;
pub mod config;
pub mod di;
pub mod domain;
pub mod grpc_client;
pub mod handler;
pub mod metrics;
pub mod model;
pub mod repository;
pub mod service;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
