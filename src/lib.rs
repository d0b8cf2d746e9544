pub mod api;
pub mod defaults;
pub mod error;
pub mod extract;
pub mod models;
pub mod order;
pub mod repository;
pub mod services;
pub mod state;
pub mod storage;
