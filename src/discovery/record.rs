//! SRV answers and the deterministic ranking comparator.

// self
use crate::_prelude::*;

/// Host name that is always ranked last within its priority/weight tie group.
pub const LOCALHOST: &str = "localhost";

/// One SRV answer returned by the DNS collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceRecord {
	/// Lower values are preferred.
	pub priority: u16,
	/// Higher values are preferred within equal priority.
	pub weight: u16,
	/// Target host advertised by the record.
	pub host: String,
	/// Target port advertised by the record.
	pub port: u16,
}
impl ServiceRecord {
	/// Creates a record from its SRV fields.
	pub fn new(priority: u16, weight: u16, host: impl Into<String>, port: u16) -> Self {
		Self { priority, weight, host: host.into(), port }
	}

	/// Returns `true` if the record targets the literal `localhost` host.
	pub fn is_localhost(&self) -> bool {
		self.host == LOCALHOST
	}
}

/// Ranking comparator; [`Ordering::Less`] means `a` is preferred over `b`.
///
/// 1. Ascending `priority`.
/// 2. Descending `weight`.
/// 3. Same host: ascending `port`. Otherwise a `localhost` record sorts after any other host,
///    and two non-local hosts sort lexicographically.
pub fn compare_records(a: &ServiceRecord, b: &ServiceRecord) -> Ordering {
	a.priority.cmp(&b.priority).then_with(|| b.weight.cmp(&a.weight)).then_with(|| tie_break(a, b))
}

/// Sorts records into preference order. The sort is stable, so exact duplicates keep their
/// answer order.
pub fn rank_records(records: &mut [ServiceRecord]) {
	records.sort_by(compare_records);
}

fn tie_break(a: &ServiceRecord, b: &ServiceRecord) -> Ordering {
	if a.host == b.host {
		return a.port.cmp(&b.port);
	}

	match (a.is_localhost(), b.is_localhost()) {
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		_ => a.host.cmp(&b.host),
	}
}
