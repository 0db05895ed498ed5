pub mod audit;
pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod menu;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
