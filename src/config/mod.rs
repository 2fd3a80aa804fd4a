//! Configuration module for atlas-voyager.
//!
//! - `config_struct`: Config struct definition and defaults
//! - `io`: Config loading, saving, and API key resolution

mod config_struct;
mod io;

pub use config_struct::Config;
pub use io::{get_config_path, load_config, load_config_from, resolve_api_key, save_config, save_config_to};
