// self
use crate::{_prelude::*, discovery::Environment, obs::OpKind};

/// A span builder used around crate operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("platform_auth.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for the remainder of the synchronous section.
	pub fn entered(self) -> OpSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OpSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OpSpanGuard {}
		}
	}
}

/// RAII guard returned by [`OpSpan::entered`].
pub struct OpSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for OpSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OpSpanGuard(..)")
	}
}

/// Emits a debug event listing the ranked environments for a service (hosts and ports only).
pub fn record_ranking(service: &str, environments: &[Environment]) {
	#[cfg(feature = "tracing")]
	{
		let ranked = environments.iter().map(Environment::authority).collect::<Vec<_>>();

		tracing::debug!(service, count = environments.len(), ?ranked, "ranked SRV answers");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (service, environments);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn op_span_noop_without_tracing() {
		let _guard = OpSpan::new(OpKind::TokenParse, "test").entered();
		// Compile-time smoke test ensures the guard exists even when tracing is disabled.
	}

	#[test]
	fn record_ranking_accepts_empty_sets() {
		record_ranking("_api._tcp.example.com", &[]);
	}
}
