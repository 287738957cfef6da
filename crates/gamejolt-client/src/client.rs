use std::time::Duration;

use gamejolt_core::{
    decode_properties, Base64Sanitizer, Error, JsonSerializer, ObjectSerializer, PropertyRecord,
    RequestBuilder, Result, Sanitizer, SignedRequest, Transport, User,
};
use tracing::debug;

use crate::config::ClientConfig;
use crate::session::SessionCache;
use crate::transport::UreqTransport;

/// Client for one game.
///
/// Owns its request signer, its transport and the cached verified user.
/// Operations on a user's data or trophies require a prior successful
/// [`verify_user`](Self::verify_user).
pub struct GameClient<S = JsonSerializer> {
    requests: RequestBuilder,
    transport: Box<dyn Transport>,
    sanitizer: Box<dyn Sanitizer>,
    serializer: S,
    session: SessionCache,
}

impl GameClient<JsonSerializer> {
    pub fn new(game_id: u64, private_key: impl Into<String>) -> Self {
        Self::with_transport(game_id, private_key, UreqTransport::default())
    }

    pub fn with_transport(
        game_id: u64,
        private_key: impl Into<String>,
        transport: impl Transport + 'static,
    ) -> Self {
        GameClient {
            requests: RequestBuilder::new(game_id, private_key),
            transport: Box::new(transport),
            sanitizer: Box::new(Base64Sanitizer),
            serializer: JsonSerializer,
            session: SessionCache::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let game_id = config.game_id.unwrap_or_default();
        let transport = UreqTransport::new(Duration::from_secs(config.timeout_secs));
        Ok(Self::with_transport(game_id, config.private_key.clone(), transport)
            .with_api_root(config.api_root.clone())
            .with_version(config.version.clone()))
    }
}

impl<S: ObjectSerializer> GameClient<S> {
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.requests = self.requests.with_api_root(api_root);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.requests = self.requests.with_version(version);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizer = Box::new(sanitizer);
        self
    }

    pub fn with_serializer<S2: ObjectSerializer>(self, serializer: S2) -> GameClient<S2> {
        GameClient {
            requests: self.requests,
            transport: self.transport,
            sanitizer: self.sanitizer,
            serializer,
            session: self.session,
        }
    }

    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    pub fn session(&self) -> &SessionCache {
        &self.session
    }

    /// Check a username/token pair with the service.
    ///
    /// Re-verifying the pair that is already cached returns `true` without a
    /// request. Any other pair is checked remotely and replaces the cached
    /// user only when the service accepts it.
    pub fn verify_user(&self, username: &str, token: &str) -> Result<bool> {
        let user = User::new(username, token);
        self.session
            .verify_with(&user, |u| self.call_for_success(&self.requests.verify_user(u)))
    }

    pub fn verified_user(&self) -> Option<User> {
        self.session.require().ok()
    }

    pub(crate) fn sanitizer(&self) -> &dyn Sanitizer {
        self.sanitizer.as_ref()
    }

    pub(crate) fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Execute and return the body as text. Non-OK statuses are errors.
    pub(crate) fn call(&self, req: &SignedRequest) -> Result<String> {
        let resp = self.transport.execute(&req.url())?;
        debug!(url = %req.redacted_url(), status = resp.status, "request executed");
        if !resp.is_ok() {
            return Err(Error::Status(resp.status));
        }
        String::from_utf8(resp.body)
            .map_err(|e| Error::malformed(format!("response is not UTF-8: {}", e)))
    }

    pub(crate) fn call_for_properties(&self, req: &SignedRequest) -> Result<PropertyRecord> {
        self.call(req).map(|text| decode_properties(&text))
    }

    /// The `success` flag of a flat response.
    pub(crate) fn call_for_success(&self, req: &SignedRequest) -> Result<bool> {
        let props = self.call_for_properties(req)?;
        let success = props.get_bool("success");
        if !success {
            if let Some(message) = props.message() {
                debug!(service_message = message, "service reported failure");
            }
        }
        Ok(success)
    }
}

impl<S> std::fmt::Debug for GameClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameClient")
            .field("requests", &self.requests)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
