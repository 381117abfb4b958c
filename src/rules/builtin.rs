use crate::error::Result;
use crate::model::SYSFS;
use crate::rules::matcher::{PatternRule, PreCheck};
use crate::rules::rewriter::Rewrite;

/// Shortest container ID format recognized (8-4-4-4-4 hex groups, as used by Garden).
pub const CONTAINER_ID_MIN_LEN: usize = 28;

/// Container ID formats, tried left to right at each position:
/// - 64 hex characters (Docker, containerd, CRI-O)
/// - 32 hex characters, a hyphen and a numeric suffix (AWS ECS)
/// - 8-4-4-4-4 hex groups (Garden)
/// - any other hex run of at least 28 characters, e.g. 40-character SHA-1 IDs
pub const CONTAINER_ID_PATTERN: &str = concat!(
	r"[0-9a-fA-F]{64}",
	r"|[0-9a-fA-F]{32}-[0-9]+",
	r"|[0-9a-fA-F]{8}(?:-[0-9a-fA-F]{4}){4}",
	r"|[0-9a-fA-F]{28,}",
);

fn wildcard(group: usize) -> Rewrite {
	Rewrite::Literal {
		group,
		replacement: "*".to_string(),
	}
}

fn sysfs_only() -> PreCheck {
	PreCheck::Filesystem(SYSFS.to_string())
}

/// The built-in reduction rules, in evaluation order.
///
/// Order matters: each rule sees the output of the ones before it.
pub fn builtin_rules() -> Result<Vec<PatternRule>> {
	Ok(vec![
		PatternRule::new(
			"process pid",
			r"/proc/([0-9]+)/",
			Rewrite::PidSelfOrWildcard { group: 1 },
		)?
		.with_hint("proc"),
		PatternRule::new("thread id", r"/task/([0-9]+)/", wildcard(1))?.with_hint("task"),
		PatternRule::new(
			"kubernetes pod cgroup",
			r"kubepods-([^/]*)\.(?:slice|scope)",
			wildcard(1),
		)?
		.with_hint("kubepods")
		.with_pre_check(sysfs_only()),
		PatternRule::new(
			"containerd cgroup",
			r"cri-containerd-([^/]*)\.(?:slice|scope)",
			wildcard(1),
		)?
		.with_hint("cri-containerd")
		.with_pre_check(sysfs_only()),
		PatternRule::new("container id", CONTAINER_ID_PATTERN, wildcard(0))?
			.with_pre_check(PreCheck::HexRun(CONTAINER_ID_MIN_LEN)),
		PatternRule::new(
			"virtual block device",
			r"/sys/devices/virtual/block/(?:dm-|loop)([0-9]+)",
			wildcard(1),
		)?
		.with_hint("devices")
		.with_pre_check(sysfs_only()),
		PatternRule::new(
			"service account token",
			r"secrets/kubernetes\.io/serviceaccount/([0-9._]+)",
			wildcard(1),
		)?
		.with_hint("serviceaccount"),
	])
}
