use crate::error::ReducerError;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.pathreduce.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.pathreduce.toml.
	#[serde(default)]
	pub root: bool,

	/// If true, only the rules declared in config files are applied.
	#[serde(default)]
	pub disable_builtin_rules: bool,

	/// Environment variable name that, if truthy, skips ~/.pathreduce.toml lookup.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// Extra reduction rules, applied after the built-in ones in declaration order.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A user-defined reduction rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Display name; defaults to the pattern.
	pub name: Option<String>,

	/// Regex whose matches are rewritten.
	pub pattern: String,

	/// Substring required in the path before the regex is run.
	pub hint: Option<String>,

	/// Only apply to files on this filesystem kind (mutually exclusive with min_hex_run).
	pub filesystem: Option<String>,

	/// Only apply when the path has a hex-or-hyphen run this long (mutually exclusive with filesystem).
	pub min_hex_run: Option<usize>,

	/// Capture group to rewrite. Defaults to 1 if the pattern has groups, else the whole match.
	pub group: Option<usize>,

	/// Literal written over the group (mutually exclusive with pid_aware). Defaults to "*".
	pub replacement: Option<String>,

	/// Treat the group as a pid: "self" for the owning process, "*" otherwise.
	#[serde(default)]
	pub pid_aware: bool,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All rules from all configs, in cascade order.
	pub rules: Vec<RuleWithSource>,

	/// Whether the built-in rules are disabled (from any config in cascade).
	pub disable_builtin_rules: bool,
}

/// A rule with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// The config file this rule came from.
	pub source: PathBuf,
}

impl Rule {
	/// Validate that mutually exclusive fields are not both set.
	pub fn validate(&self) -> Result<(), ReducerError> {
		let exclusive = [
			(
				("filesystem", self.filesystem.is_some()),
				("min_hex_run", self.min_hex_run.is_some()),
			),
			(
				("pid_aware", self.pid_aware),
				("replacement", self.replacement.is_some()),
			),
		];

		for ((option1, set1), (option2, set2)) in exclusive {
			if set1 && set2 {
				return Err(ReducerError::MutuallyExclusive {
					option1: option1.to_string(),
					option2: option2.to_string(),
				});
			}
		}

		Ok(())
	}
}

impl Config {
	/// Validate all rules in this config, including that their patterns compile.
	pub fn validate(&self) -> Result<(), ReducerError> {
		for rule in &self.rules {
			rule.compile()?;
		}
		Ok(())
	}
}
