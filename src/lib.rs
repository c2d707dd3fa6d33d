pub mod config;
pub mod errors;
pub mod merge;
pub mod pipeline;
pub mod sources;
pub mod utils;
pub mod xmltv;
