use crate::url::parse_absolute;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads seed URLs from a line-delimited file
///
/// Blank lines and lines starting with `#` are skipped. Every other line must be an
/// absolute HTTP(S) URL; a malformed seed aborts startup rather than silently shrinking
/// the crawl. Seeds are returned in normalized form (`http://host` becomes
/// `http://host/`).
pub fn load_seeds(path: &Path) -> ConfigResult<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Seeds {
        path: path.display().to_string(),
        source,
    })?;
    parse_seeds(&content)
}

/// Parses seed URLs from text, one per line
pub fn parse_seeds(content: &str) -> ConfigResult<Vec<String>> {
    let mut seeds = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let seed = parse_absolute(line).map_err(|e| {
            ConfigError::InvalidUrl(format!("seed on line {} ('{}'): {}", index + 1, line, e))
        })?;

        // Same spelling as extracted links, so the seen set matches them
        seeds.push(String::from(seed));
    }

    Ok(seeds)
}
