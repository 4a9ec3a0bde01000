// Library for tests to access modules

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod poller;
pub mod routes;
pub mod surface;
pub mod version;
