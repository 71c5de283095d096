pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{AutoPilot, HookChain, LoggingHooks};
pub use app::run_simulation;
pub use config::{toml_config::TomlConfig, DrawConfig};
pub use core::{
    draw::DrawEngine,
    rendezvous::{Inbox, Submitter},
    session::{Session, SessionManager, SessionReport},
};
pub use utils::error::{DrawError, Result};
