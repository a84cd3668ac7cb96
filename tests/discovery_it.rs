// std
use std::{
	fmt::{Display, Formatter, Result as FmtResult},
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// self
use platform_auth::{
	discovery::{
		Environment, EnvironmentResolver, ServiceName, ServiceRecord, SrvLookup, StaticSrvLookup,
	},
	error::{DiscoveryError, Error},
	sync::Guard,
};

const SERVICE: &str = "_platform._tcp.example.com";

fn service() -> ServiceName {
	ServiceName::new(SERVICE).expect("Service fixture should be valid.")
}

fn hosts(resolver: &EnvironmentResolver<StaticSrvLookup>) -> Vec<String> {
	resolver
		.resolve(SERVICE)
		.expect("Resolution should succeed.")
		.into_iter()
		.map(|env| env.host)
		.collect()
}

#[derive(Debug)]
struct Timeout;
impl Display for Timeout {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("query timed out")
	}
}
impl std::error::Error for Timeout {}

#[derive(Default)]
struct CountingLookup {
	queries: AtomicUsize,
}
impl SrvLookup for CountingLookup {
	type Error = Timeout;

	fn query_service_records(
		&self,
		_service: &ServiceName,
	) -> Result<Vec<ServiceRecord>, Self::Error> {
		let attempt = self.queries.fetch_add(1, Ordering::SeqCst);

		if attempt == 0 {
			return Err(Timeout);
		}

		Ok(vec![ServiceRecord::new(0, 0, "eu.example.com", 443)])
	}
}

#[test]
fn priority_and_weight_order_answers() {
	let lookup = StaticSrvLookup::default();

	lookup.insert(
		service(),
		[
			ServiceRecord::new(1, 5, "a", 443),
			ServiceRecord::new(1, 10, "b", 443),
			ServiceRecord::new(0, 1, "c", 443),
		],
	);

	assert_eq!(hosts(&EnvironmentResolver::new(lookup)), ["c", "b", "a"]);
}

#[test]
fn localhost_ranks_after_remote_peers() {
	let lookup = StaticSrvLookup::default();

	lookup.insert(
		service(),
		[ServiceRecord::new(1, 5, "localhost", 80), ServiceRecord::new(1, 5, "remote", 80)],
	);

	let resolver = EnvironmentResolver::new(lookup);

	assert_eq!(hosts(&resolver), ["remote", "localhost"]);
	assert_eq!(
		resolver.resolve_preferred(SERVICE).expect("A preferred environment should exist."),
		Environment::new("remote", 80)
	);
}

#[test]
fn duplicates_are_kept() {
	let lookup = StaticSrvLookup::default();

	lookup.insert(
		service(),
		[
			ServiceRecord::new(0, 0, "dup", 443),
			ServiceRecord::new(0, 0, "dup", 443),
			ServiceRecord::new(0, 0, "alt", 443),
		],
	);

	assert_eq!(hosts(&EnvironmentResolver::new(lookup)), ["alt", "dup", "dup"]);
}

#[test]
fn lookup_failures_surface_without_retry() {
	let lookup = Arc::new(CountingLookup::default());
	let resolver = EnvironmentResolver::new(lookup.clone());
	let err = resolver.resolve(SERVICE).expect_err("First query should fail.");

	assert!(matches!(err, DiscoveryError::Lookup { ref service, .. } if service == SERVICE));
	assert_eq!(lookup.queries.load(Ordering::SeqCst), 1);

	let error = Error::from(err);

	assert!(error.to_string().contains(SERVICE));

	let ranked = resolver.resolve(SERVICE).expect("Second query should succeed.");

	assert_eq!(ranked.preferred().map(Environment::authority).as_deref(), Some("eu.example.com:443"));
	assert_eq!(lookup.queries.load(Ordering::SeqCst), 2);
}

#[test]
fn injected_failures_map_to_lookup_errors() {
	let lookup = StaticSrvLookup::default();

	lookup.fail_with(service(), "SERVFAIL");

	let err = EnvironmentResolver::new(lookup)
		.resolve(SERVICE)
		.expect_err("Injected failures should propagate.");
	let source = std::error::Error::source(&err).expect("Lookup errors carry a source.");

	assert_eq!(source.to_string(), "SERVFAIL");
}

#[test]
fn sdk_can_cache_the_preferred_environment_behind_a_guard() {
	let lookup = StaticSrvLookup::default();

	lookup.insert(
		service(),
		[ServiceRecord::new(0, 10, "primary", 443), ServiceRecord::new(1, 10, "standby", 443)],
	);

	let resolver = EnvironmentResolver::new(lookup.clone());
	let cached: Guard<Option<Environment>> = Guard::default();

	std::thread::scope(|scope| {
		for _ in 0..8 {
			scope.spawn(|| {
				cached.with_lock(|slot| {
					if slot.is_none() {
						*slot = Some(
							resolver.resolve_preferred(SERVICE).expect("Resolution should succeed."),
						);
					}
				});
			});
		}
	});

	assert_eq!(cached.into_inner(), Some(Environment::new("primary", 443)));
}
