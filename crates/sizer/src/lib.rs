//! Sizing service - exposes the provisioning planner over HTTP

pub mod api;
pub mod config;
