pub mod env;
pub mod server;
