use std::path::PathBuf;

/// Library-level structured errors for path-reducer.
///
/// Reducing a path never fails; these errors only surface while loading
/// configuration and compiling rules. The CLI binary wraps them with
/// `anyhow` for context chains.
#[derive(Debug, thiserror::Error)]
pub enum ReducerError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Capture group {group} does not exist in pattern: {pattern}")]
	UnknownGroup { pattern: String, group: usize },

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using ReducerError.
pub type Result<T> = std::result::Result<T, ReducerError>;
