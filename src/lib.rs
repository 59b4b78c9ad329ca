pub mod config;
pub mod llama;
pub mod search;
pub mod utils;
