pub mod agents;
pub mod config;
pub mod console;
pub mod error;
pub mod form;
pub mod request;
pub mod snapshot;
