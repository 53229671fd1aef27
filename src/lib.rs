pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod status;
pub mod store;
pub mod task_id;
pub mod view;
