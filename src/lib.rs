pub mod config;
pub mod host;
pub mod speed;
pub mod animator;

// Decorative layer
pub mod progress;
pub mod chains;
pub mod scene;

pub mod timeline;
pub mod theme;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
