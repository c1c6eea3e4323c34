//! Configuration module for Site-Tap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_tap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("tap.toml")).unwrap();
//! println!("Crawling from: {}", config.tap.site_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExtractConfig, HttpConfig, TapConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
