pub mod config;
pub mod controller;
pub mod error;
pub mod links;
pub mod models;
pub mod storage;
pub mod view;
pub mod watchlist;
