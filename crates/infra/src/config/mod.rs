//! Configuration loading
//!
//! Reads the `.env` file, the environment, and JSON/TOML config files into
//! the domain [`Config`](thanksync_domain::Config).

pub mod loader;

pub use loader::{from_lookup, load, load_dotenv, load_from_env, load_from_file, locate_config_path};
