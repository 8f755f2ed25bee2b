#![warn(clippy::unwrap_used)]

pub mod rest;
pub mod server;
pub mod store;
pub mod swagger;

pub use rest::AppState;
pub use server::ApiServer;
pub use store::InMemoryCreativeStore;
pub use swagger::ApiDoc;
