pub mod analytics;
pub mod api;
pub mod billing;
pub mod config;
pub mod domain;
pub mod email;
pub mod error;
pub mod gallery;
pub mod payments;
pub mod repository;
pub mod service;
