//! Request helpers shared by handlers.

pub mod client_ip;

pub use client_ip::client_ip;
