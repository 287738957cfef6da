pub use gamejolt_core as protocol;

pub mod client;
pub mod config;
pub mod datastore;
pub mod session;
pub mod transport;
mod trophies;

pub use client::GameClient;
pub use config::{load_config, ClientConfig, ConfigError};
pub use datastore::{ClearReport, KeyFailure, LoadAll};
pub use gamejolt_core::{Difficulty, Error, Result, Trophy, TrophyFilter, User};
pub use session::{SessionCache, SessionState};
pub use transport::UreqTransport;
