//! Optional observability helpers for discovery and token parsing.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `platform_auth.op` with the `op` (operation)
//!   and `stage` (call site) fields, plus a debug event describing each ranked answer set.
//! - Enable `metrics` to increment the `platform_auth_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod tracing;

pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// SRV lookup and ranking performed by the environment resolver.
	Discovery,
	/// Token-issuance response parsing.
	TokenParse,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Discovery => "discovery",
			OpKind::TokenParse => "token_parse",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}

	/// Maps a result into its terminal outcome label.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => OpOutcome::Success,
			Err(_) => OpOutcome::Failure,
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!("platform_auth_op_total", "op" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
