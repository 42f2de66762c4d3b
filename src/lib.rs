#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else, clippy::missing_errors_doc)]

//! A small school administration service: students and teachers, each with a REST
//! collection/item API backed by one Postgres table, soft deletes via an `activo`
//! flag, and a server-rendered dashboard.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod data;
pub mod error;
pub mod maud_conveniences;
pub mod routes;
pub mod shell;
pub mod state;
