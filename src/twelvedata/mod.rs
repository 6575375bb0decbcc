pub mod client;

pub use client::TwelveDataClient;
