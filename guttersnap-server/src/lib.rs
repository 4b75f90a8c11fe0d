//! # GutterSnap Server
//!
//! Receives completed photo requests from the GutterSnap web form:
//!
//! - `POST /submit-request` accepts the contact fields and nine photos as
//!   `multipart/form-data`, re-checks them and relays the request by mail
//! - every other path is served from the static directory
#![allow(missing_docs)]

pub mod handlers;
pub mod infra;
pub mod relay;
pub mod routes;
pub mod uploads;

pub use infra::app_state::AppState;
