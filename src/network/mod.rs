pub mod client;
pub mod protocol;
pub mod server;

pub use client::{ClientSummary, NetworkClient};
pub use server::{run_session, serve, start_server};
