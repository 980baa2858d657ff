//! Configuration module for linkcheck
//!
//! Settings come from the command line and, optionally, a TOML file. Both are
//! merged and validated here before any crawling starts.
//!
//! # Example
//!
//! ```no_run
//! use linkcheck::config::{load_config, CliOverrides};
//!
//! let config = load_config(None, CliOverrides::default()).unwrap();
//! println!("Crawling {} with {} workers", config.root, config.crawlers);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::{build_config, load_config, load_file_config, CliOverrides};
pub use types::{default_crawlers, default_user_agent, CheckConfig, FileConfig, DEFAULT_ROOT};
