//! Rain Assistant: a Vietnamese weather chat service.
//!
//! A message is parsed for a place and a day, the provider forecast for that
//! day is fetched, and rain questions are answered by a pre-trained regression
//! model fed from the forecast.

pub mod api;
pub mod chat;
pub mod config;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod ml;
pub mod nlp;
pub mod telemetry;
