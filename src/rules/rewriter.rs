use crate::model::{FileMetadata, ProcessIdentity};
use tracing::trace;

/// What a rule writes over a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
	/// Replace the span of capture group `group` (0 is the whole match) with a literal.
	Literal { group: usize, replacement: String },

	/// Replace a pid capture with `self` when it is the owning process, `*` otherwise.
	PidSelfOrWildcard { group: usize },
}

impl Rewrite {
	/// Capture group this rewrite operates on.
	pub fn group(&self) -> usize {
		match self {
			Rewrite::Literal { group, .. } | Rewrite::PidSelfOrWildcard { group } => *group,
		}
	}

	/// Rewrite the current match of `ctx` in place.
	///
	/// Matches whose target group did not participate are left alone, as are
	/// pids that do not fit in 32 bits.
	pub fn apply(&self, ctx: &mut RewriteContext<'_>) {
		let Some((start, end)) = ctx.group(self.group()) else {
			return;
		};

		match self {
			Rewrite::Literal { replacement, .. } => ctx.replace_by(start, end, replacement),
			Rewrite::PidSelfOrWildcard { .. } => {
				let Ok(pid) = ctx.path()[start..end].parse::<u32>() else {
					trace!(value = &ctx.path()[start..end], "not a 32-bit pid, leaving as is");
					return;
				};

				if pid == ctx.process().pid {
					ctx.replace_by(start, end, "self");
				} else {
					ctx.replace_by(start, end, "*");
				}
			}
		}
	}
}

impl std::fmt::Display for Rewrite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Rewrite::Literal { group, replacement } => {
				write!(f, "group {group} -> {replacement:?}")
			}
			Rewrite::PidSelfOrWildcard { group } => write!(f, "group {group} -> \"self\" | \"*\""),
		}
	}
}

/// Mutable state of a single reduction call.
///
/// Created lazily on the first match and dropped when the call returns.
#[derive(Debug)]
pub struct RewriteContext<'a> {
	/// Capture-group offsets of the match being rewritten.
	groups: Vec<Option<(usize, usize)>>,

	/// The path as rewritten so far.
	path: String,

	file: Option<&'a FileMetadata>,

	process: &'a ProcessIdentity,
}

impl<'a> RewriteContext<'a> {
	pub fn new(path: &str, file: Option<&'a FileMetadata>, process: &'a ProcessIdentity) -> Self {
		RewriteContext {
			groups: Vec::new(),
			path: path.to_string(),
			file,
			process,
		}
	}

	/// Point the context at the next match to rewrite.
	pub fn set_groups(&mut self, groups: Vec<Option<(usize, usize)>>) {
		self.groups = groups;
	}

	/// Byte offsets of capture group `index` in the current match.
	pub fn group(&self, index: usize) -> Option<(usize, usize)> {
		self.groups.get(index).copied().flatten()
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn file(&self) -> Option<&'a FileMetadata> {
		self.file
	}

	pub fn process(&self) -> &'a ProcessIdentity {
		self.process
	}

	/// Replace `path[start..end]` with `replacement`.
	pub fn replace_by(&mut self, start: usize, end: usize, replacement: &str) {
		let left = &self.path[..start];
		let right = &self.path[end..];

		let mut rewritten = String::with_capacity(left.len() + replacement.len() + right.len());
		rewritten.push_str(left);
		rewritten.push_str(replacement);
		rewritten.push_str(right);
		self.path = rewritten;
	}

	pub fn into_path(self) -> String {
		self.path
	}
}
