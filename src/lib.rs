pub mod app;
pub mod classify;
pub mod commands;
pub mod config;
pub mod directory;
pub mod emoji;
pub mod inventory;
pub mod model;
pub mod naming;
pub mod reconcile;
pub mod slack;
pub mod support;
