pub mod db;
pub mod server;

pub use server::ServerConfig;
