pub mod add_to_repository;
pub mod config;
pub mod features;
pub mod maven;
pub mod repository;
pub mod util;
