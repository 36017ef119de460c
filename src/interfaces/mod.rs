pub mod cli;
pub mod handlers;
pub mod repositories;
pub mod routes;
pub mod ui;
