pub mod catalog;
pub mod feed;
pub mod pipeline;
pub mod reddit;
pub mod spotify;
pub mod title_parser;
