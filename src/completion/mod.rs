mod client;
mod error;

pub use client::CompletionClient;
pub use error::CompletionError;
