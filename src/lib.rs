//! Banking back office service: banks, clients and their accounts.
//!
//! Request payloads are checked against per-type field constraints, business
//! rules are enforced in [`app::AppService`], and every failure is turned into
//! a localized JSON response by [`api::classify`].

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
