//! Shared HTTP transport for the source adapters
//!
//! Every adapter goes through a [`Fetcher`]. The production implementation
//! is [`HttpFetcher`]; tests substitute their own.

mod client;

pub use client::{
    build_http_client, FetchError, FetchRequest, Fetcher, HttpFetcher, Method, RawResponse,
};
