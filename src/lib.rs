// ABOUTME: Library root for edgeflip - exposes the promotion pipeline and its types.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod distribution;
pub mod error;
pub mod output;
pub mod promote;
pub mod provider;
pub mod release;
pub mod types;
