//! Outbound services and response building blocks.

pub mod cookies;
pub mod discord;
pub mod webhook;
