use serde::Deserialize;

/// Filesystem kind reported by the kernel event decoder for sysfs mounts.
pub const SYSFS: &str = "sysfs";

/// Metadata about the file a path was observed on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileMetadata {
	/// Short filesystem tag, e.g. "sysfs", "ext4", "overlay".
	pub filesystem: String,
}

impl FileMetadata {
	pub fn new(filesystem: impl Into<String>) -> Self {
		FileMetadata {
			filesystem: filesystem.into(),
		}
	}

	pub fn is_sysfs(&self) -> bool {
		self.filesystem == SYSFS
	}
}

/// The process node that owns the path being reduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ProcessIdentity {
	pub pid: u32,
}

impl ProcessIdentity {
	pub fn new(pid: u32) -> Self {
		ProcessIdentity { pid }
	}
}
