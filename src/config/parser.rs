use crate::config::types::Config;
use crate::error::{ReducerError, Result};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	if !path.exists() {
		return Err(ReducerError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	let content =
		std::fs::read_to_string(path).map_err(|source| ReducerError::ConfigReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| ReducerError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let path = PathBuf::from("test.toml");
		let config = parse_config_str("", &path).unwrap();

		assert!(!config.root);
		assert!(!config.disable_builtin_rules);
		assert!(config.root_config_lookup_disable_env_var.is_none());
		assert!(config.rules.is_empty());
	}

	#[test]
	fn test_parse_basic_config() {
		let content = r#"
root = true
disable-builtin-rules = true
root-config-lookup-disable-env-var = "CI"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert!(config.disable_builtin_rules);
		assert_eq!(
			config.root_config_lookup_disable_env_var,
			Some("CI".to_string())
		);
	}

	#[test]
	fn test_parse_rules_array_of_tables() {
		let content = r#"
[[rules]]
name = "systemd session"
pattern = 'session-([0-9]+)\.scope'
hint = "session-"
filesystem = "cgroup2"

[[rules]]
pattern = '/var/log/pods/[^/]+/'
replacement = "/var/log/pods/*/"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.rules.len(), 2);

		let rule1 = &config.rules[0];
		assert_eq!(rule1.name, Some("systemd session".to_string()));
		assert_eq!(rule1.pattern, r"session-([0-9]+)\.scope");
		assert_eq!(rule1.hint, Some("session-".to_string()));
		assert_eq!(rule1.filesystem, Some("cgroup2".to_string()));
		assert!(!rule1.pid_aware);

		let rule2 = &config.rules[1];
		assert_eq!(rule2.replacement, Some("/var/log/pods/*/".to_string()));
		assert!(rule2.group.is_none());
	}

	#[test]
	fn test_parse_rules_inline_tables() {
		let content = r#"
rules = [
    { pattern = '/pid/([0-9]+)/', pid_aware = true },
    { pattern = 'run-([0-9a-f]{12})', min_hex_run = 12 },
]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.rules.len(), 2);
		assert!(config.rules[0].pid_aware);
		assert_eq!(config.rules[1].min_hex_run, Some(12));
	}

	#[test]
	fn test_rule_requires_pattern() {
		let content = r#"
[[rules]]
hint = "proc"
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		assert!(matches!(
			result.unwrap_err(),
			ReducerError::ConfigParseError { .. }
		));
	}

	#[test]
	fn test_mutually_exclusive_pre_checks() {
		let content = r#"
[[rules]]
pattern = 'x'
filesystem = "sysfs"
min_hex_run = 28
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			ReducerError::MutuallyExclusive { option1, option2 } => {
				assert_eq!(option1, "filesystem");
				assert_eq!(option2, "min_hex_run");
			}
			_ => panic!("Expected MutuallyExclusive error"),
		}
	}

	#[test]
	fn test_mutually_exclusive_rewrites() {
		let content = r#"
[[rules]]
pattern = '/pid/([0-9]+)/'
pid_aware = true
replacement = "x"
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			ReducerError::MutuallyExclusive { option1, option2 } => {
				assert_eq!(option1, "pid_aware");
				assert_eq!(option2, "replacement");
			}
			_ => panic!("Expected MutuallyExclusive error"),
		}
	}

	#[test]
	fn test_invalid_regex_rejected_at_parse() {
		let content = r#"
[[rules]]
pattern = '[invalid'
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		match result.unwrap_err() {
			ReducerError::InvalidRegex { pattern, .. } => assert_eq!(pattern, "[invalid"),
			_ => panic!("Expected InvalidRegex error"),
		}
	}

	#[test]
	fn test_unknown_group_rejected_at_parse() {
		let content = r#"
[[rules]]
pattern = '/proc/([0-9]+)/'
group = 2
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		assert!(matches!(
			result.unwrap_err(),
			ReducerError::UnknownGroup { group: 2, .. }
		));
	}

	#[test]
	fn test_missing_file() {
		let result = parse_config_file(Path::new("/nonexistent/.pathreduce.toml"));
		assert!(matches!(
			result.unwrap_err(),
			ReducerError::ConfigNotFound { .. }
		));
	}
}
