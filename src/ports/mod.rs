pub mod credentials;
pub mod reddit;
pub mod spotify;
