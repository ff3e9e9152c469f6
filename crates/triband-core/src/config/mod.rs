//! Configuration for triband front ends
//!
//! - Generic YAML config loading/saving
//! - Engine configuration (block size, trim ramp, start-up parameters)
//! - Standard config paths
//!
//! # Usage
//!
//! ```ignore
//! use triband_core::config::{default_config_path, load_config, EngineConfig};
//!
//! let config: EngineConfig = load_config(&default_config_path());
//! config.apply_params(&store)?;
//! ```

mod engine;
mod io;
mod paths;

pub use engine::EngineConfig;
pub use io::{load_config, read_config, save_config};
pub use paths::{config_dir, default_config_path};
