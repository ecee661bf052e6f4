pub mod completions;
pub mod config;
pub mod identity;
pub mod info;
pub mod track;
