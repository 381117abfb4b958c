use crate::config::types::{MergedConfig, Rule, RuleWithSource};
use crate::error::{ReducerError, Result};
use crate::model::FileMetadata;
use crate::rules::rewriter::Rewrite;
use regex::Regex;
use std::path::PathBuf;

/// Contextual gate evaluated before a rule's pattern is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreCheck {
	/// No gate.
	Always,

	/// The file must live on the given filesystem kind.
	Filesystem(String),

	/// The path must contain a run of hex-or-hyphen bytes at least this long.
	HexRun(usize),
}

impl PreCheck {
	/// Evaluate the gate against the current path and the file metadata.
	pub fn passes(&self, path: &str, file: &FileMetadata) -> bool {
		match self {
			PreCheck::Always => true,
			PreCheck::Filesystem(kind) => file.filesystem == *kind,
			PreCheck::HexRun(min_len) => has_hex_run(path, *min_len),
		}
	}
}

impl std::fmt::Display for PreCheck {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			PreCheck::Always => write!(f, "always"),
			PreCheck::Filesystem(kind) => write!(f, "filesystem == {kind}"),
			PreCheck::HexRun(min_len) => write!(f, "hex run >= {min_len}"),
		}
	}
}

/// Check whether `path` contains at least `min_len` consecutive ASCII hex digits or hyphens.
pub fn has_hex_run(path: &str, min_len: usize) -> bool {
	let mut count = 0;
	for c in path.bytes() {
		if c.is_ascii_hexdigit() || c == b'-' {
			count += 1;
			if count >= min_len {
				return true;
			}
		} else {
			count = 0;
		}
	}
	false
}

/// A compiled reduction rule: where to look, when to look, and what to write.
#[derive(Debug, Clone)]
pub struct PatternRule {
	/// Display name used in logs and `pathreduce rules`.
	pub name: String,

	/// Pattern whose non-overlapping matches are rewritten.
	pub pattern: Regex,

	/// Substring that must be present for the pattern to be run at all.
	pub hint: Option<String>,

	/// Gate evaluated only when file metadata is known.
	pub pre_check: PreCheck,

	/// Rewrite applied to each match.
	pub rewrite: Rewrite,

	/// Config file this rule came from, `None` for built-in rules.
	pub source: Option<PathBuf>,
}

impl PatternRule {
	/// Compile a rule with no hint and no pre-check.
	///
	/// Fails if the pattern does not compile or if the rewrite targets a
	/// capture group the pattern does not have.
	pub fn new(name: impl Into<String>, pattern: &str, rewrite: Rewrite) -> Result<Self> {
		Self::from_regex(name, compile_regex(pattern)?, rewrite)
	}

	/// Build a rule around an already compiled pattern.
	pub fn from_regex(name: impl Into<String>, regex: Regex, rewrite: Rewrite) -> Result<Self> {
		if rewrite.group() >= regex.captures_len() {
			return Err(ReducerError::UnknownGroup {
				pattern: regex.as_str().to_string(),
				group: rewrite.group(),
			});
		}

		Ok(PatternRule {
			name: name.into(),
			pattern: regex,
			hint: None,
			pre_check: PreCheck::Always,
			rewrite,
			source: None,
		})
	}

	pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
		self.hint = Some(hint.into());
		self
	}

	pub fn with_pre_check(mut self, pre_check: PreCheck) -> Self {
		self.pre_check = pre_check;
		self
	}

	pub fn with_source(mut self, source: PathBuf) -> Self {
		self.source = Some(source);
		self
	}

	/// Cheap checks run before the pattern itself.
	///
	/// The pre-check only gates when file metadata is available; without it
	/// the rule stays a candidate. The hint is a plain substring test.
	pub fn is_candidate(&self, path: &str, file: Option<&FileMetadata>) -> bool {
		if let Some(file) = file
			&& !self.pre_check.passes(path, file)
		{
			return false;
		}

		if let Some(ref hint) = self.hint
			&& !path.contains(hint.as_str())
		{
			return false;
		}

		true
	}

	/// Capture-group offsets of every non-overlapping match, left to right.
	///
	/// Returns an empty vector (no allocation) when nothing matches.
	pub fn match_offsets(&self, path: &str) -> Vec<Vec<Option<(usize, usize)>>> {
		self.pattern
			.captures_iter(path)
			.map(|caps| {
				caps.iter()
					.map(|m| m.map(|m| (m.start(), m.end())))
					.collect()
			})
			.collect()
	}
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| ReducerError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

impl Rule {
	/// Turn a configured rule into a compiled one.
	pub fn compile(&self) -> Result<PatternRule> {
		self.validate()?;

		let regex = compile_regex(&self.pattern)?;
		// group 1 when the pattern captures anything, the whole match otherwise
		let group = self
			.group
			.unwrap_or(if regex.captures_len() > 1 { 1 } else { 0 });

		let rewrite = if self.pid_aware {
			Rewrite::PidSelfOrWildcard { group }
		} else {
			Rewrite::Literal {
				group,
				replacement: self
					.replacement
					.clone()
					.unwrap_or_else(|| "*".to_string()),
			}
		};

		let pre_check = match (&self.filesystem, self.min_hex_run) {
			(Some(kind), _) => PreCheck::Filesystem(kind.clone()),
			(None, Some(min_len)) => PreCheck::HexRun(min_len),
			(None, None) => PreCheck::Always,
		};

		let name = self
			.name
			.clone()
			.unwrap_or_else(|| format!("custom: {}", self.pattern));

		let mut rule = PatternRule::from_regex(name, regex, rewrite)?.with_pre_check(pre_check);
		if let Some(ref hint) = self.hint {
			rule = rule.with_hint(hint.clone());
		}
		Ok(rule)
	}
}

/// Compile a rule from a RuleWithSource.
pub fn compile_rule(rws: &RuleWithSource) -> Result<PatternRule> {
	Ok(rws.rule.compile()?.with_source(rws.source.clone()))
}

/// Compile all custom rules in a merged config, in cascade order.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<PatternRule>> {
	config.rules.iter().map(compile_rule).collect()
}
