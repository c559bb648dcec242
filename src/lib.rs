pub mod agent;
pub mod app;
pub mod chart;
pub mod component;
pub mod config;
pub mod db;
pub mod logger;
pub mod store;
pub mod terminal;
pub mod update;
