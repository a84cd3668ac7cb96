//! Resolved endpoints and the ranked list handed to the SDK.

// std
use std::{slice::Iter, vec::IntoIter};
// self
use crate::{_prelude::*, discovery::ServiceRecord};

/// Resolved network target the SDK talks to.
///
/// Equality and hashing consider `host` and `port` only; `name` is a display label.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Environment {
	/// Target host copied from the SRV record.
	pub host: String,
	/// Target port copied from the SRV record.
	pub port: u16,
	/// Optional human-readable label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}
impl Environment {
	/// Creates an unnamed environment.
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port, name: None }
	}

	/// Attaches a human-readable label.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Returns `host:port`, bracketing IPv6 literals.
	pub fn authority(&self) -> String {
		if self.host.contains(':') && !self.host.starts_with('[') {
			format!("[{}]:{}", self.host, self.port)
		} else {
			format!("{}:{}", self.host, self.port)
		}
	}

	/// Builds a base URL such as `https://api.example.com:8443/`.
	pub fn base_url(&self, scheme: &str) -> Result<Url, url::ParseError> {
		Url::parse(&format!("{scheme}://{}/", self.authority()))
	}
}
impl PartialEq for Environment {
	fn eq(&self, other: &Self) -> bool {
		self.host == other.host && self.port == other.port
	}
}
impl Eq for Environment {}
impl Hash for Environment {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.host.hash(state);
		self.port.hash(state);
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.name {
			Some(name) => write!(f, "{name} ({})", self.authority()),
			None => f.write_str(&self.authority()),
		}
	}
}
impl From<ServiceRecord> for Environment {
	fn from(record: ServiceRecord) -> Self {
		Self::new(record.host, record.port)
	}
}
impl From<&ServiceRecord> for Environment {
	fn from(record: &ServiceRecord) -> Self {
		Self::new(record.host.clone(), record.port)
	}
}

/// Environments in preference order; the first entry is the preferred endpoint.
///
/// Duplicate `(host, port)` pairs are kept as returned by DNS.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedEnvironments(Vec<Environment>);
impl RankedEnvironments {
	pub(crate) fn from_ranked(environments: Vec<Environment>) -> Self {
		Self(environments)
	}

	/// The most preferred environment, if any were resolved.
	pub fn preferred(&self) -> Option<&Environment> {
		self.0.first()
	}

	/// Number of ranked environments.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if nothing was resolved.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator in preference order.
	pub fn iter(&self) -> Iter<'_, Environment> {
		self.0.iter()
	}

	/// Returns the underlying slice in preference order.
	pub fn as_slice(&self) -> &[Environment] {
		&self.0
	}

	/// Consumes the list and returns the ranked vector.
	pub fn into_vec(self) -> Vec<Environment> {
		self.0
	}
}
impl IntoIterator for RankedEnvironments {
	type IntoIter = IntoIter<Environment>;
	type Item = Environment;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
impl<'a> IntoIterator for &'a RankedEnvironments {
	type IntoIter = Iter<'a, Environment>;
	type Item = &'a Environment;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;

	#[test]
	fn equality_ignores_the_label() {
		let plain = Environment::new("api.example.com", 443);
		let named = Environment::new("api.example.com", 443).with_name("production");

		assert_eq!(plain, named);
		assert_eq!(HashSet::from([plain, named]).len(), 1);
		assert_ne!(Environment::new("api.example.com", 443), Environment::new("api.example.com", 8443));
	}

	#[test]
	fn authority_and_urls_follow_host_kind() {
		let dns = Environment::new("api.example.com", 8443);
		let v6 = Environment::new("::1", 8080);

		assert_eq!(dns.authority(), "api.example.com:8443");
		assert_eq!(v6.authority(), "[::1]:8080");
		assert_eq!(
			dns.base_url("https").expect("DNS hosts should form a valid URL.").as_str(),
			"https://api.example.com:8443/"
		);
		assert_eq!(
			v6.base_url("http").expect("IPv6 literals should form a valid URL.").as_str(),
			"http://[::1]:8080/"
		);
	}

	#[test]
	fn display_includes_optional_label() {
		let env = Environment::new("eu.example.com", 443).with_name("eu");

		assert_eq!(env.to_string(), "eu (eu.example.com:443)");
		assert_eq!(Environment::new("eu.example.com", 443).to_string(), "eu.example.com:443");
	}

	#[test]
	fn ranked_list_exposes_preferred_first() {
		let ranked = RankedEnvironments::from_ranked(vec![
			Environment::new("first", 1),
			Environment::new("second", 2),
		]);

		assert_eq!(ranked.preferred(), Some(&Environment::new("first", 1)));
		assert_eq!(ranked.len(), 2);
		assert_eq!(
			ranked.iter().map(|env| env.host.as_str()).collect::<Vec<_>>(),
			["first", "second"]
		);
		assert!(RankedEnvironments::default().preferred().is_none());
	}

	#[test]
	fn ranked_list_serializes_as_a_plain_array() {
		let ranked = RankedEnvironments::from_ranked(vec![Environment::new("a", 1)]);
		let payload = serde_json::to_string(&ranked).expect("Ranked list should serialize.");

		assert_eq!(payload, r#"[{"host":"a","port":1}]"#);
	}
}
