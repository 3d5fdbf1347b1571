pub mod app;

pub mod config;

pub mod entry;

pub mod legacy;

pub mod normalize;

pub mod parse;

pub mod schema;

pub mod submission;

pub mod summary;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
