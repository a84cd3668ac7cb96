//! Environment discovery over DNS SRV answers.
//!
//! [`EnvironmentResolver`] asks an [`SrvLookup`] collaborator for the records advertised under a
//! service name, ranks them with [`compare_records`], and maps each ranked record onto an
//! [`Environment`]. The ranking is a deterministic total order rather than the RFC 2782
//! weighted-random selection: a given answer set always yields the same preferred endpoint,
//! trading load distribution across equal peers for a stable per-process choice.

pub mod environment;
pub mod lookup;
pub mod name;
pub mod record;
pub mod resolver;

pub use environment::*;
pub use lookup::*;
pub use name::*;
pub use record::*;
pub use resolver::*;
