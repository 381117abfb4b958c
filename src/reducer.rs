use crate::config::types::MergedConfig;
use crate::error::Result;
use crate::model::{FileMetadata, ProcessIdentity};
use crate::rules::{PatternRule, RewriteContext, builtin_rules, compile_rules};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, trace};

static BUILTIN: LazyLock<PathReducer> = LazyLock::new(|| {
	PathReducer::with_builtin_rules().expect("built-in path reducer patterns must compile")
});

/// Reduces paths according to an ordered list of rules.
///
/// The rule list is fixed at construction. Reducing takes `&self`, so one
/// reducer can be shared across threads without locking.
#[derive(Debug, Clone)]
pub struct PathReducer {
	rules: Vec<PatternRule>,
}

impl PathReducer {
	pub fn new(rules: Vec<PatternRule>) -> Self {
		PathReducer { rules }
	}

	/// A reducer running only the built-in rules.
	pub fn with_builtin_rules() -> Result<Self> {
		Ok(PathReducer::new(builtin_rules()?))
	}

	/// Process-wide reducer with the built-in rules, compiled on first use.
	pub fn builtin() -> &'static PathReducer {
		&BUILTIN
	}

	/// Built-in rules (unless disabled) followed by the configured rules.
	pub fn from_config(config: &MergedConfig) -> Result<Self> {
		let mut rules = if config.disable_builtin_rules {
			Vec::new()
		} else {
			builtin_rules()?
		};
		rules.extend(compile_rules(config)?);

		debug!(
			rules = rules.len(),
			builtin = !config.disable_builtin_rules,
			"path reducer configured"
		);
		Ok(PathReducer::new(rules))
	}

	pub fn rules(&self) -> &[PatternRule] {
		&self.rules
	}

	/// Reduce `path` observed on `file` by the process `process`.
	///
	/// Rules run in order, each on the output of the previous one. Within a
	/// rule, matches are rewritten right to left so earlier offsets stay
	/// valid. The input is returned borrowed when no rule rewrote it.
	pub fn reduce_path<'p>(
		&self,
		path: &'p str,
		file: Option<&FileMetadata>,
		process: &ProcessIdentity,
	) -> Cow<'p, str> {
		let mut ctx: Option<RewriteContext<'_>> = None;

		for rule in &self.rules {
			let current = ctx.as_ref().map_or(path, |ctx| ctx.path());

			if !rule.is_candidate(current, file) {
				continue;
			}

			let matches = rule.match_offsets(current);
			if matches.is_empty() {
				continue;
			}

			trace!(rule = %rule.name, matches = matches.len(), "rewriting path");

			let ctx = ctx.get_or_insert_with(|| RewriteContext::new(path, file, process));
			for groups in matches.into_iter().rev() {
				ctx.set_groups(groups);
				rule.rewrite.apply(ctx);
			}
		}

		match ctx {
			Some(ctx) => Cow::Owned(ctx.into_path()),
			None => Cow::Borrowed(path),
		}
	}
}

impl Default for PathReducer {
	fn default() -> Self {
		PathReducer::builtin().clone()
	}
}
