#![forbid(unsafe_code)]

pub mod aliases;
pub mod bridge;
pub mod checklist;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod models;
pub mod observation;
pub mod raw;
pub mod state;
pub mod status;
pub mod storage;
pub mod value_utils;
