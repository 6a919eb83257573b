pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod inference;
pub mod logging;
pub mod profile;
pub mod recommend;
