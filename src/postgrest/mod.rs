pub mod types;
pub mod client;

pub use client::PostgrestClient;
