#![doc = "The `taskdash` library crate."]
#![doc = ""]
#![doc = "Backend pieces (models, auth, routes, storage) for the task dashboard,"]
#![doc = "plus the `client` module that a native frontend uses to drive the"]
#![doc = "session lifecycle against a running server. The binary (`main.rs`)"]
#![doc = "assembles the actix application from these modules."]

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
