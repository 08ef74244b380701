pub mod api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod gui;
pub mod logging;
pub mod render;
pub mod state;
