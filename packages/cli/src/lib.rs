// ABOUTME: Server composition for the Offerkit binary
// ABOUTME: Environment-derived configuration lives here

pub mod config;

pub use config::Config;
