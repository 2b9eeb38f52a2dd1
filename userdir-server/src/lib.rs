#![cfg_attr(not(test), forbid(unsafe_code))]

//! Library surface of the User Directory server.
//!
//! The binary in `main.rs` drives [`server::run`]; integration tests assemble
//! the router through the same public functions.

pub mod app_state;
pub mod db;
pub mod handlers;
pub mod http;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod services;
pub mod tracer;
