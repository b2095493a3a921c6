//! Healthcare assistant HTTP service: chat API, history, and the browser chat page.

pub mod config;
pub mod render;
pub mod server;
