//! Environment discovery and token lifecycle primitives for platform SDK clients: rank DNS SRV
//! answers into a stable endpoint preference list, parse token-issuance responses, and guard the
//! shared state that ties them together.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod discovery;
pub mod error;
pub mod obs;
pub mod sync;
pub mod token;

mod _prelude {
	pub use std::{
		cmp::Ordering,
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		hash::{Hash, Hasher},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{DecodeError, DiscoveryError, Result};
}

pub use url;
#[cfg(test)] use rand as _;
