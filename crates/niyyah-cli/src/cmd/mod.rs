pub mod auth;
pub mod config;
pub mod dashboard;
pub mod now;
pub mod persona;
pub mod principle;
pub mod schedule;
pub mod settings;
pub mod tracker;
