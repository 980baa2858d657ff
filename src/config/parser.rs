use crate::config::types::{
    default_crawlers, default_user_agent, CheckConfig, FileConfig, DEFAULT_ROOT,
};
use crate::config::validation::{
    validate_crawlers, validate_excludes, validate_root, validate_schemes,
};
use crate::url::{LinkFilter, INERT_SCHEMES};
use crate::ConfigError;
use std::path::Path;

/// Values given on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root: Option<String>,
    pub crawlers: Option<usize>,
    pub exclude: Vec<String>,
}

/// Loads and parses an optional TOML settings file
///
/// # Arguments
///
/// * `path` - Path to the TOML file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully parsed file
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use linkcheck::config::load_file_config;
///
/// let file = load_file_config(Path::new("linkcheck.toml")).unwrap();
/// println!("Crawlers: {:?}", file.crawlers);
/// ```
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Merges file settings with command-line overrides and validates the result
///
/// Command-line values win. Excluded prefixes from both sources are combined.
pub fn build_config(file: FileConfig, cli: CliOverrides) -> Result<CheckConfig, ConfigError> {
    let root = cli
        .root
        .or(file.root)
        .unwrap_or_else(|| DEFAULT_ROOT.to_string());
    let root = validate_root(&root)?;

    let crawlers = cli
        .crawlers
        .or(file.crawlers)
        .unwrap_or_else(default_crawlers);
    validate_crawlers(crawlers)?;

    let mut exclude = file.exclude;
    exclude.extend(cli.exclude);
    validate_excludes(&exclude)?;

    let schemes = match file.excluded_schemes {
        Some(schemes) => {
            validate_schemes(&schemes)?;
            schemes
        }
        None => INERT_SCHEMES.iter().map(|s| s.to_string()).collect(),
    };

    Ok(CheckConfig {
        root,
        crawlers,
        filter: LinkFilter::with_schemes(schemes, exclude),
        user_agent: file.user_agent.unwrap_or_else(default_user_agent),
    })
}

/// Loads the optional settings file and merges the command line into it
pub fn load_config(path: Option<&Path>, cli: CliOverrides) -> Result<CheckConfig, ConfigError> {
    let file = match path {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    build_config(file, cli)
}
