pub mod add;
pub mod albums;
pub mod auth_cmd;
pub mod browse;
pub mod common;
pub mod config;
pub mod dashboard;
pub mod delete;
pub mod edit;
pub mod list;
pub mod search;
pub mod show;
