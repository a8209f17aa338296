// Library exports for the Snake autopilot
// This allows the replay tool and other utilities to use the core decision logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod game;
pub mod grid;
pub mod policy;
pub mod replay;
pub mod search;
pub mod simulate;
pub mod types;
