//! API Access
//!
//! Browser transport and the stored backend URL.

mod client;

pub use client::{client, get_api_base, set_api_base, GlooTransport, DEFAULT_API_BASE};
