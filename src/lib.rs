pub mod config;
pub mod document;
pub mod domain;
pub mod ena;
pub mod error;
pub mod eva;
pub mod files;
pub mod harvest;
pub mod http;
pub mod merge;
pub mod output;
pub mod record;
pub mod size;
