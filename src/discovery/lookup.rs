//! DNS collaborator contract and an in-memory implementation.

// self
use crate::{
	_prelude::*,
	discovery::{ServiceName, ServiceRecord},
};

/// Source of SRV answers for a service name.
///
/// Implementations wrap whatever DNS client the SDK ships with. Lookups are synchronous from
/// the caller's perspective; timeouts and cancellation belong to the implementation.
pub trait SrvLookup
where
	Self: Send + Sync,
{
	/// Concrete error emitted by the underlying resolver.
	type Error: 'static + Send + Sync + StdError;

	/// Returns every SRV record advertised under `service`, in answer order.
	fn query_service_records(
		&self,
		service: &ServiceName,
	) -> Result<Vec<ServiceRecord>, Self::Error>;
}
impl<L> SrvLookup for Arc<L>
where
	L: ?Sized + SrvLookup,
{
	type Error = L::Error;

	fn query_service_records(
		&self,
		service: &ServiceName,
	) -> Result<Vec<ServiceRecord>, Self::Error> {
		L::query_service_records(self, service)
	}
}

/// Errors produced by [`StaticSrvLookup`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StaticLookupError {
	/// No answer set was registered for the service.
	#[error("No SRV answers are registered for `{service}`.")]
	NotFound {
		/// Service name that was queried.
		service: String,
	},
	/// A failure injected with [`StaticSrvLookup::fail_with`].
	#[error("{message}")]
	Injected {
		/// Injected failure message.
		message: String,
	},
}

#[derive(Clone, Debug)]
enum StaticAnswer {
	Records(Vec<ServiceRecord>),
	Failure(String),
}

type AnswerMap = Arc<RwLock<HashMap<ServiceName, StaticAnswer>>>;

/// Thread-safe answer table for tests, demos, and SDK static fallbacks.
///
/// Clones share the same table.
#[derive(Clone, Debug, Default)]
pub struct StaticSrvLookup(AnswerMap);
impl StaticSrvLookup {
	/// Registers (or replaces) the answer set for `service`.
	pub fn insert<I>(&self, service: ServiceName, records: I)
	where
		I: IntoIterator<Item = ServiceRecord>,
	{
		self.0.write().insert(service, StaticAnswer::Records(records.into_iter().collect()));
	}

	/// Makes every subsequent query for `service` fail with `message`.
	pub fn fail_with(&self, service: ServiceName, message: impl Into<String>) {
		self.0.write().insert(service, StaticAnswer::Failure(message.into()));
	}

	/// Forgets the answer registered for `service`.
	pub fn remove(&self, service: &ServiceName) -> bool {
		self.0.write().remove(service).is_some()
	}
}
impl SrvLookup for StaticSrvLookup {
	type Error = StaticLookupError;

	fn query_service_records(
		&self,
		service: &ServiceName,
	) -> Result<Vec<ServiceRecord>, Self::Error> {
		match self.0.read().get(service) {
			Some(StaticAnswer::Records(records)) => Ok(records.clone()),
			Some(StaticAnswer::Failure(message)) =>
				Err(StaticLookupError::Injected { message: message.clone() }),
			None => Err(StaticLookupError::NotFound { service: service.to_string() }),
		}
	}
}
