pub mod admin;
pub mod config;
pub mod csv;
pub mod delivery;
pub mod diagnostics;
pub mod environment;
pub mod errors;
pub mod normalization;
pub mod roster;
pub mod screens;
pub mod session;
pub mod store;
pub mod ui;
