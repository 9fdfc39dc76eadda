//! Civic - dashboards and onboarding for NGOs, donors and volunteers
//!
//! The `civic` binary drives a terminal UI over these modules; the
//! session, routing, wizard and catalog layers carry no terminal code and
//! are usable on their own.

pub mod app;
pub mod catalog;
pub mod config;
pub mod env_vars;
pub mod logging;
pub mod routes;
pub mod session;
pub mod storage;
pub mod ui;
pub mod wizard;
