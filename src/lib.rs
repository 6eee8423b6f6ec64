//! Natural-language and voice question answering over a small employee database.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod nlp;
pub mod speech;
pub mod sql;
