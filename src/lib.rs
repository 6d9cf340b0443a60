#[macro_use]
extern crate rocket;

pub mod config;
pub mod db;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod server;
pub mod services;
pub mod utils;
