//! HTTP surface of the Happy2Help backend
//!
//! Exposes the authentication routes, the access token middleware and the
//! ownership and role guards that protect resource routes.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
