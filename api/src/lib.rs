//! HTTP surface for the Tessera session service
//!
//! Exposes refresh, logout and session listing over actix-web, plus a
//! health endpoint that reports database reachability.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
