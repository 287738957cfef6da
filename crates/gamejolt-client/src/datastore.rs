//! Key/value storage, per game and per user.
//!
//! Strings are stored as given. Objects go through the client's serializer
//! and then its sanitizer, and come back the reverse way. The batch
//! operations list the keys first and then touch each key with its own
//! request, in listing order. A key that fails is skipped and reported in the
//! result; nothing is rolled back.

use std::collections::HashSet;

use gamejolt_core::serializer::serializes_to_null;
use gamejolt_core::{
    decode_blocks, decode_status_line, Error, ObjectSerializer, Result, SerializerError, User,
    KEY_LISTING_LAYOUT,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::GameClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scope {
    Game,
    User,
}

impl Scope {
    fn remove_hint(self) -> &'static str {
        match self {
            Scope::Game => "remove_game_data",
            Scope::User => "remove_user_data",
        }
    }
}

/// A key skipped by a batch operation, and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFailure {
    pub key: String,
    pub reason: String,
}

/// Values loaded by a `load_all_*` call, in key listing order, each key at
/// most once.
///
/// Keys whose fetch failed or that had no value are absent from the values
/// and listed in [`failed`](Self::failed).
#[derive(Clone, Debug, PartialEq)]
pub struct LoadAll<T> {
    values: Vec<(String, T)>,
    failed: Vec<KeyFailure>,
}

impl<T> LoadAll<T> {
    fn empty() -> Self {
        Self {
            values: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn failed(&self) -> &[KeyFailure] {
        &self.failed
    }

    pub fn into_values(self) -> Vec<(String, T)> {
        self.values
    }
}

/// Outcome of a `clear_all_*` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClearReport {
    listed: bool,
    removed: Vec<String>,
    failed: Vec<KeyFailure>,
}

impl ClearReport {
    /// Whether the key listing itself succeeded. Per-key removals are
    /// reported separately.
    pub fn is_success(&self) -> bool {
        self.listed
    }

    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn failed(&self) -> &[KeyFailure] {
        &self.failed
    }
}

impl<S: ObjectSerializer> GameClient<S> {
    // ── game scope ──────────────────────────────────────────────────

    /// Store `data` under `key`. `None` is rejected; use
    /// [`remove_game_data`](Self::remove_game_data) to delete.
    pub fn store_game_data<'a>(&self, key: &str, data: impl Into<Option<&'a str>>) -> Result<bool> {
        self.store_text(Scope::Game, key, data.into())
    }

    pub fn store_game_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<bool> {
        self.store_object(Scope::Game, key, value)
    }

    pub fn fetch_game_data(&self, key: &str) -> Result<Option<String>> {
        self.fetch_text(Scope::Game, key)
    }

    pub fn fetch_game_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.fetch_object(Scope::Game, key)
    }

    pub fn remove_game_data(&self, key: &str) -> Result<bool> {
        self.remove(Scope::Game, key)
    }

    pub fn game_data_keys(&self) -> Result<Vec<String>> {
        self.list_keys(Scope::Game).map(|(_, keys)| keys)
    }

    pub fn load_all_game_data<T: DeserializeOwned>(&self) -> Result<LoadAll<T>> {
        self.load_all(Scope::Game)
    }

    pub fn clear_all_game_data(&self) -> Result<ClearReport> {
        self.clear_all(Scope::Game)
    }

    // ── user scope ──────────────────────────────────────────────────

    pub fn store_user_data<'a>(&self, key: &str, data: impl Into<Option<&'a str>>) -> Result<bool> {
        self.store_text(Scope::User, key, data.into())
    }

    pub fn store_user_object<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<bool> {
        self.store_object(Scope::User, key, value)
    }

    pub fn fetch_user_data(&self, key: &str) -> Result<Option<String>> {
        self.fetch_text(Scope::User, key)
    }

    pub fn fetch_user_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.fetch_object(Scope::User, key)
    }

    pub fn remove_user_data(&self, key: &str) -> Result<bool> {
        self.remove(Scope::User, key)
    }

    pub fn user_data_keys(&self) -> Result<Vec<String>> {
        self.list_keys(Scope::User).map(|(_, keys)| keys)
    }

    pub fn load_all_user_data<T: DeserializeOwned>(&self) -> Result<LoadAll<T>> {
        self.load_all(Scope::User)
    }

    pub fn clear_all_user_data(&self) -> Result<ClearReport> {
        self.clear_all(Scope::User)
    }

    // ── shared ──────────────────────────────────────────────────────

    fn scope_user(&self, scope: Scope) -> Result<Option<User>> {
        match scope {
            Scope::Game => Ok(None),
            Scope::User => self.session().require().map(Some),
        }
    }

    fn store_text(&self, scope: Scope, key: &str, data: Option<&str>) -> Result<bool> {
        let user = self.scope_user(scope)?;
        let data = data.ok_or_else(|| {
            Error::InvalidArgument(format!(
                "You supplied a null string for storing. This is invalid, if you would like to remove data, please use the {} method",
                scope.remove_hint()
            ))
        })?;
        self.store_raw(key, data, user.as_ref())
    }

    fn store_object<T: Serialize + ?Sized>(&self, scope: Scope, key: &str, value: &T) -> Result<bool> {
        let user = self.scope_user(scope)?;
        if serializes_to_null(value) {
            return Err(Error::InvalidArgument(format!(
                "You supplied a null object for storing. This is invalid, if you would like to remove data, please use the {} method",
                scope.remove_hint()
            )));
        }
        let bytes = self.serializer().serialize(value).map_err(|e| match e {
            SerializerError::NoOutput(_) => Error::InvalidArgument(format!(
                "serializer produced no bytes for {}; encode \"no data\" as an empty byte array",
                std::any::type_name::<T>()
            )),
            other => Error::InvalidArgument(format!(
                "could not serialize {}: {}",
                std::any::type_name::<T>(),
                other
            )),
        })?;
        let text = self.sanitizer().sanitize(&bytes);
        self.store_raw(key, &text, user.as_ref())
    }

    fn store_raw(&self, key: &str, data: &str, user: Option<&User>) -> Result<bool> {
        self.call_for_success(&self.requests().store_data(key, data, user))
    }

    fn fetch_text(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let user = self.scope_user(scope)?;
        self.fetch_raw(key, user.as_ref())
    }

    fn fetch_raw(&self, key: &str, user: Option<&User>) -> Result<Option<String>> {
        let text = self.call(&self.requests().fetch_data(key, user))?;
        Ok(decode_status_line(&text).into_value())
    }

    fn fetch_object<T: DeserializeOwned>(&self, scope: Scope, key: &str) -> Result<Option<T>> {
        let user = self.scope_user(scope)?;
        self.fetch_decoded(key, user.as_ref())
    }

    fn fetch_decoded<T: DeserializeOwned>(&self, key: &str, user: Option<&User>) -> Result<Option<T>> {
        match self.fetch_raw(key, user)? {
            Some(text) => self.decode_value(&text).map(Some),
            None => Ok(None),
        }
    }

    fn decode_value<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        let bytes = self.sanitizer().unsanitize(text)?;
        self.serializer()
            .deserialize(&bytes)
            .map_err(|e| Error::malformed(format!("stored value: {}", e)))
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<bool> {
        let user = self.scope_user(scope)?;
        self.remove_raw(key, user.as_ref())
    }

    fn remove_raw(&self, key: &str, user: Option<&User>) -> Result<bool> {
        self.call_for_success(&self.requests().remove_data(key, user))
    }

    /// The listing's success flag and its keys, each once, in first-seen
    /// order. A failed listing has no keys.
    fn list_keys(&self, scope: Scope) -> Result<(bool, Vec<String>)> {
        let user = self.scope_user(scope)?;
        self.list_keys_for(user.as_ref())
    }

    fn list_keys_for(&self, user: Option<&User>) -> Result<(bool, Vec<String>)> {
        let text = self.call(&self.requests().data_keys(user))?;
        let listing = decode_blocks(&text, &KEY_LISTING_LAYOUT);
        if !listing.is_success() {
            return Ok((false, Vec::new()));
        }
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for key in listing
            .records
            .iter()
            .filter_map(|r| r.get(KEY_LISTING_LAYOUT.id_field))
        {
            if seen.insert(key) {
                keys.push(key.to_string());
            } else {
                debug!(key = %key, "key listed twice; ignoring repeat");
            }
        }
        Ok((true, keys))
    }

    fn load_all<T: DeserializeOwned>(&self, scope: Scope) -> Result<LoadAll<T>> {
        let user = self.scope_user(scope)?;
        let (_, keys) = self.list_keys_for(user.as_ref())?;
        let mut out = LoadAll::empty();
        for key in keys {
            match self.fetch_decoded::<T>(&key, user.as_ref()) {
                Ok(Some(value)) => out.values.push((key, value)),
                Ok(None) => {
                    debug!(key = %key, "no value stored; skipped");
                    out.failed.push(KeyFailure {
                        key,
                        reason: "no value".to_string(),
                    });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to load key; skipped");
                    out.failed.push(KeyFailure {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }

    fn clear_all(&self, scope: Scope) -> Result<ClearReport> {
        let user = self.scope_user(scope)?;
        let (listed, keys) = self.list_keys_for(user.as_ref())?;
        let mut report = ClearReport {
            listed,
            ..ClearReport::default()
        };
        for key in keys {
            match self.remove_raw(&key, user.as_ref()) {
                Ok(true) => report.removed.push(key),
                Ok(false) => {
                    warn!(key = %key, "service refused removal; skipped");
                    report.failed.push(KeyFailure {
                        key,
                        reason: "removal refused".to_string(),
                    });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to remove key; skipped");
                    report.failed.push(KeyFailure {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }
}
