// Library exports for the blog
// Integration tests build the router and database from here

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
pub mod views;
