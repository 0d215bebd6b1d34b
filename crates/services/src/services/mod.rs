pub mod access;
pub mod api_client;
pub mod auth;
pub mod config;
pub mod culture_cycle_form;
pub mod dashboard;
pub mod forms;
pub mod pond_form;
pub mod resources;
pub mod role_form;
