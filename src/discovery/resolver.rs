//! Environment resolver and its configuration builder.

// std
use std::num::NonZeroUsize;
// self
use crate::{
	_prelude::*,
	discovery::{Environment, RankedEnvironments, ServiceName, SrvLookup, rank_records},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Resolution policy applied by [`EnvironmentResolver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
	/// Treat an empty answer set as a valid, empty result instead of
	/// [`DiscoveryError::NoRecords`]. Enable when the SDK has a static fallback.
	pub allow_empty: bool,
	/// Keep only the top-N ranked environments.
	pub limit: Option<NonZeroUsize>,
	/// Port substituted for answers that advertise port `0`.
	pub default_port: Option<u16>,
}

/// Builder for [`EnvironmentResolver`].
#[derive(Debug)]
pub struct EnvironmentResolverBuilder<L> {
	lookup: L,
	config: ResolverConfig,
}
impl<L> EnvironmentResolverBuilder<L>
where
	L: SrvLookup,
{
	/// Accepts empty answer sets when `allow` is true.
	pub fn allow_empty(mut self, allow: bool) -> Self {
		self.config.allow_empty = allow;

		self
	}

	/// Keeps only the `limit` most preferred environments.
	pub fn limit(mut self, limit: NonZeroUsize) -> Self {
		self.config.limit = Some(limit);

		self
	}

	/// Substitutes `port` for answers advertising port `0`.
	pub fn default_port(mut self, port: u16) -> Self {
		self.config.default_port = Some(port);

		self
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: ResolverConfig) -> Self {
		self.config = config;

		self
	}

	/// Finishes the builder.
	pub fn build(self) -> EnvironmentResolver<L> {
		EnvironmentResolver { lookup: self.lookup, config: self.config }
	}
}

/// Resolves service names into ranked [`Environment`] lists.
///
/// Every call queries the collaborator afresh; nothing is cached here. Concurrent calls are
/// independent and return identical rankings for identical answer sets.
#[derive(Clone, Debug)]
pub struct EnvironmentResolver<L> {
	lookup: L,
	config: ResolverConfig,
}
impl<L> EnvironmentResolver<L>
where
	L: SrvLookup,
{
	/// Creates a resolver with the default policy (empty answers are errors, no limit).
	pub fn new(lookup: L) -> Self {
		Self::builder(lookup).build()
	}

	/// Returns a builder for customizing the resolution policy.
	pub fn builder(lookup: L) -> EnvironmentResolverBuilder<L> {
		EnvironmentResolverBuilder { lookup, config: ResolverConfig::default() }
	}

	/// Active resolution policy.
	pub fn config(&self) -> &ResolverConfig {
		&self.config
	}

	/// Validates `service` and resolves it. See [`EnvironmentResolver::resolve_name`].
	pub fn resolve(&self, service: &str) -> Result<RankedEnvironments, DiscoveryError> {
		let service = ServiceName::new(service)?;

		self.resolve_name(&service)
	}

	/// Queries SRV records for `service` and returns them as ranked environments.
	pub fn resolve_name(
		&self,
		service: &ServiceName,
	) -> Result<RankedEnvironments, DiscoveryError> {
		const KIND: OpKind = OpKind::Discovery;

		let _span = OpSpan::new(KIND, "resolve").entered();

		obs::record_outcome(KIND, OpOutcome::Attempt);

		let result = self.resolve_inner(service);

		obs::record_outcome(KIND, OpOutcome::of(&result));

		result
	}

	/// Resolves `service` and returns only its preferred environment.
	///
	/// An empty answer set is always [`DiscoveryError::NoRecords`] here, even when the policy
	/// allows empty lists.
	pub fn resolve_preferred(&self, service: &str) -> Result<Environment, DiscoveryError> {
		self.resolve(service)?
			.into_iter()
			.next()
			.ok_or_else(|| DiscoveryError::NoRecords { service: service.to_owned() })
	}

	fn resolve_inner(&self, service: &ServiceName) -> Result<RankedEnvironments, DiscoveryError> {
		let mut records = self
			.lookup
			.query_service_records(service)
			.map_err(|err| DiscoveryError::lookup(service.to_string(), err))?;

		if records.is_empty() && !self.config.allow_empty {
			return Err(DiscoveryError::NoRecords { service: service.to_string() });
		}

		// Substituted ports take part in the same-host port tie-break.
		if let Some(port) = self.config.default_port {
			records.iter_mut().filter(|record| record.port == 0).for_each(|record| record.port = port);
		}

		rank_records(&mut records);

		let take = self.config.limit.map_or(records.len(), NonZeroUsize::get);
		let environments =
			records.into_iter().take(take).map(Environment::from).collect::<Vec<_>>();

		obs::record_ranking(service, &environments);

		Ok(RankedEnvironments::from_ranked(environments))
	}
}
