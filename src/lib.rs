// Library for tests to access modules

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod schema;
pub mod session;
pub mod version;
