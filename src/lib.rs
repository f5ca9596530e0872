// src/lib.rs

//! saberdl: custom song downloader library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
