//! Crate-level error types shared by the discovery and token modules.

// self
use crate::{_prelude::*, discovery::ServiceNameError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Environment discovery failed.
	#[error(transparent)]
	Discovery(#[from] DiscoveryError),
	/// Token-issuance payload could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}

/// Failures raised while resolving a service name into ranked environments.
#[derive(Debug, ThisError)]
pub enum DiscoveryError {
	/// The DNS collaborator failed to answer the query.
	#[error("SRV lookup for `{service}` failed.")]
	Lookup {
		/// Service name that was queried.
		service: String,
		/// Collaborator-specific failure.
		#[source]
		source: BoxError,
	},
	/// The query succeeded but returned no records.
	#[error("SRV lookup for `{service}` returned no records.")]
	NoRecords {
		/// Service name that was queried.
		service: String,
	},
	/// The service name failed validation before any query was issued.
	#[error(transparent)]
	InvalidServiceName(#[from] ServiceNameError),
}
impl DiscoveryError {
	/// Wraps a collaborator failure for the provided service.
	pub fn lookup(
		service: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Lookup { service: service.into(), source: Box::new(src) }
	}
}

/// Failures raised while parsing a token-issuance response.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Payload is not well-formed JSON or a required field is missing or mistyped.
	#[error("Token response is malformed at `{}`.", .source.path())]
	Json {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A complete JSON document was followed by further input.
	#[error("Token response has trailing data after the JSON document.")]
	TrailingData {
		/// Underlying syntax failure.
		#[source]
		source: serde_json::Error,
	},
	/// The expires_in value cannot be represented as an expiry instant.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
