pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod evaluation;
pub mod events;
pub mod render;
pub mod spinner;
pub mod transport;
pub mod view;
