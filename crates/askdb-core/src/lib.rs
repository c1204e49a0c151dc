pub mod classify;
pub mod config;
pub mod engine;
pub mod errors;
pub mod gateway;
pub mod model;
pub mod prompt;
pub mod providers;
pub mod retrieval;
pub mod session;
pub mod storage;
pub mod synth;
