use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, RuleWithSource};
use crate::error::{ReducerError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in each directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".pathreduce.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.pathreduce.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.pathreduce.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;
			let root = config.root;
			debug!(path = %config_path.display(), root, "loaded config");

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if root {
				break;
			}
		}

		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		// The walk may already have reached the home directory.
		if !configs.iter().any(|loaded| loaded.path == user_config.path) {
			configs.push(user_config);
		}
	}

	Ok(configs)
}

/// Load the user's ~/.pathreduce.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& is_env_truthy(env_var)
		{
			debug!(env_var = %env_var, "user config lookup disabled");
			return Ok(None);
		}
	}

	let user_config_path = user_config_path()?;

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into a single effective config.
///
/// Rules are collected in cascade order. Built-in rules are disabled if any
/// config disables them.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		for rule in &loaded.config.rules {
			merged.rules.push(RuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			});
		}

		if loaded.config.disable_builtin_rules {
			merged.disable_builtin_rules = true;
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Load a single config file, bypassing the cascade.
pub fn load_config_file(path: &Path) -> Result<MergedConfig> {
	let config = parse_config_file(path)?;
	Ok(merge_configs(&[LoadedConfig {
		config,
		path: path.to_path_buf(),
	}]))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ReducerError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
