// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! The API boundary of the scheduling engine.
//!
//! Handlers orchestrate the core crate's decisions against persistence
//! and translate every lower-level error into an [`ApiError`] before it
//! crosses the boundary. The server crate maps `ApiError` variants to
//! HTTP statuses; nothing below this crate leaks outward.

pub mod error;
pub mod handlers;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
