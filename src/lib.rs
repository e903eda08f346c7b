pub mod archive;
pub mod assets;
pub mod error;
pub mod import;
pub mod models;
pub mod output;
pub mod store;
