//! Token-issuance responses, scope views, and compact-token claim decoding.

pub mod compact;
pub mod response;
pub mod scope;
pub mod secret;

pub use compact::*;
pub use response::*;
pub use scope::*;
pub use secret::*;
