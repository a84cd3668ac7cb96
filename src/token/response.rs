//! Parsed token-issuance responses and expiry-derived state.

// self
use crate::{
	_prelude::*,
	obs::{self, OpKind, OpOutcome, OpSpan},
	token::{CompactToken, ScopeSet, ScopeValidationError, TokenSecret},
};

/// Lifecycle status of a [`TokenResponse`] at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// The access token is still within its lifetime.
	Active,
	/// The access token reached its expiry instant.
	Expired,
}

/// Controls how early [`TokenResponse::should_refresh`] asks for a new token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryPolicy {
	/// Refresh once the remaining lifetime is at or below this window.
	pub preemptive_window: Duration,
}
impl ExpiryPolicy {
	const DEFAULT_PREEMPTIVE_WINDOW: Duration = Duration::seconds(60);

	/// Overrides the preemptive window; negative values clamp to zero.
	pub fn with_preemptive_window(mut self, window: Duration) -> Self {
		self.preemptive_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}
}
impl Default for ExpiryPolicy {
	fn default() -> Self {
		Self { preemptive_window: Self::DEFAULT_PREEMPTIVE_WINDOW }
	}
}

#[derive(Deserialize)]
struct WireTokenResponse {
	access_token: String,
	refresh_token: Option<String>,
	id_token: String,
	token_type: String,
	scope: String,
	expires_in: i64,
}

/// Credential produced by one token issuance or refresh exchange.
///
/// Values are immutable; a refresh yields a new instance.
#[derive(Clone)]
pub struct TokenResponse {
	access_token: TokenSecret,
	refresh_token: Option<TokenSecret>,
	id_token: TokenSecret,
	token_type: String,
	scope: String,
	expires_in: i64,
	received_at: OffsetDateTime,
	expires_at: OffsetDateTime,
}
impl TokenResponse {
	/// Parses a token endpoint response body received now.
	///
	/// `access_token`, `id_token`, `token_type`, `scope`, and `expires_in` are required;
	/// `refresh_token` may be absent or `null`.
	pub fn parse(raw: &[u8]) -> Result<Self, DecodeError> {
		Self::parse_at(raw, OffsetDateTime::now_utc())
	}

	/// Parses a token endpoint response body received at `received_at`.
	pub fn parse_at(raw: &[u8], received_at: OffsetDateTime) -> Result<Self, DecodeError> {
		const KIND: OpKind = OpKind::TokenParse;

		let _span = OpSpan::new(KIND, "parse").entered();

		obs::record_outcome(KIND, OpOutcome::Attempt);

		let result = Self::decode(raw, received_at);

		obs::record_outcome(KIND, OpOutcome::of(&result));

		result
	}

	fn decode(raw: &[u8], received_at: OffsetDateTime) -> Result<Self, DecodeError> {
		let mut de = serde_json::Deserializer::from_slice(raw);
		let wire: WireTokenResponse = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Json { source })?;

		de.end().map_err(|source| DecodeError::TrailingData { source })?;

		let expires_at = received_at
			.checked_add(Duration::seconds(wire.expires_in))
			.ok_or(DecodeError::ExpiresInOutOfRange)?;

		Ok(Self {
			access_token: TokenSecret::new(wire.access_token),
			refresh_token: wire.refresh_token.map(TokenSecret::new),
			id_token: TokenSecret::new(wire.id_token),
			token_type: wire.token_type,
			scope: wire.scope,
			expires_in: wire.expires_in,
			received_at,
			expires_at,
		})
	}

	/// Access token exactly as issued, for an `Authorization: Bearer` header.
	pub fn raw_bearer_token(&self) -> &str {
		self.access_token.expose()
	}

	/// Full `Authorization` header value.
	pub fn authorization_header(&self) -> String {
		format!("Bearer {}", self.raw_bearer_token())
	}

	/// Refresh token, when the provider issued one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Identity token.
	pub fn id_token(&self) -> &TokenSecret {
		&self.id_token
	}

	/// Token type reported by the provider (usually `Bearer`).
	pub fn token_type(&self) -> &str {
		&self.token_type
	}

	/// Raw `scope` field.
	pub fn scope(&self) -> &str {
		&self.scope
	}

	/// Splits the `scope` field on single spaces.
	///
	/// Empty entries are preserved, so `""` yields `[""]` and `"a  b"` yields `["a", "", "b"]`.
	/// Use [`TokenResponse::scope_set`] for a normalized view.
	pub fn scopes(&self) -> Vec<&str> {
		self.scope.split(' ').collect()
	}

	/// Deduplicated scope set that rejects malformed entries.
	pub fn scope_set(&self) -> Result<ScopeSet, ScopeValidationError> {
		ScopeSet::from_str(&self.scope)
	}

	/// Lifetime in seconds as reported by the provider.
	pub fn expires_in(&self) -> i64 {
		self.expires_in
	}

	/// Instant the response was parsed.
	pub fn received_at(&self) -> OffsetDateTime {
		self.received_at
	}

	/// Instant the access token stops being valid.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Remaining lifetime at `instant`; negative once expired.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		self.expires_at - instant
	}

	/// Computes the lifecycle status at `instant`.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant >= self.expires_at { TokenStatus::Expired } else { TokenStatus::Active }
	}

	/// Computes the lifecycle status against the current UTC clock.
	pub fn status(&self) -> TokenStatus {
		self.status_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the token is expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` if the token is expired now.
	pub fn is_expired(&self) -> bool {
		matches!(self.status(), TokenStatus::Expired)
	}

	/// Whether the SDK should request a new token at `now` under `policy`.
	pub fn should_refresh(&self, policy: &ExpiryPolicy, now: OffsetDateTime) -> bool {
		self.is_expired_at(now) || self.remaining_at(now) <= policy.preemptive_window
	}

	/// Access-token header as pretty-printed JSON; `None` if the token is not a decodable
	/// three-segment token.
	pub fn decoded_header(&self) -> Option<String> {
		self.access_token.compact().header()
	}

	/// Access-token payload as pretty-printed JSON; `None` if the token is not a decodable
	/// three-segment token.
	pub fn decoded_payload(&self) -> Option<String> {
		self.access_token.compact().payload()
	}

	/// Compact-token view over the access token.
	pub fn access_token_claims(&self) -> CompactToken<'_> {
		self.access_token.compact()
	}

	/// Compact-token view over the identity token.
	pub fn id_token_claims(&self) -> CompactToken<'_> {
		self.id_token.compact()
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("id_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("scope", &self.scope)
			.field("expires_in", &self.expires_in)
			.field("received_at", &self.received_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
