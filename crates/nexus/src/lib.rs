pub mod config;
pub mod debounce;
pub mod events;
pub mod macros;
pub mod registry;
pub mod render;
pub mod replay;
pub mod session;
pub mod sys;
