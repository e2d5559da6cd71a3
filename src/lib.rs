//! Agenda and vote-outcome tracking for municipal committee meetings.
//!
//! [`tracker::AgendaOutcomeTracker`] holds each meeting's ordered agenda
//! items, their comments and at most one vote result per item. The
//! [`handlers::api_v1`] module exposes it over JSON alongside a small
//! committee/meeting directory.

pub mod audit;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod tracker;
