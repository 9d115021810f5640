//! HTTP API handlers for canvass-api

pub mod auth;
pub mod export;
pub mod health;
pub mod responses;
pub mod surveys;
