//! Payload validation
//!
//! Validators are pure: they look at a payload and return a
//! [`ValidationResult`]. The [`SchemaRegistry`] is the only place where an
//! `Invalid` result becomes a [`Fault`], always a 400 client fault.

pub mod json_schema;
pub mod schemas;

pub use json_schema::JsonSchema;

use crate::error::{Fault, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Outcome of checking a payload against a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// A pure payload check
pub trait Validate: Send + Sync {
    fn validate(&self, payload: &Value) -> ValidationResult;
}

impl<F> Validate for F
where
    F: Fn(&Value) -> ValidationResult + Send + Sync,
{
    fn validate(&self, payload: &Value) -> ValidationResult {
        self(payload)
    }
}

/// The logical type of a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Album,
    Song,
    NewUser,
    Login,
    RefreshToken,
    Playlist,
    PlaylistSong,
    Collaboration,
    Export,
    AlbumCover,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 10] = [
        PayloadKind::Album,
        PayloadKind::Song,
        PayloadKind::NewUser,
        PayloadKind::Login,
        PayloadKind::RefreshToken,
        PayloadKind::Playlist,
        PayloadKind::PlaylistSong,
        PayloadKind::Collaboration,
        PayloadKind::Export,
        PayloadKind::AlbumCover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Album => "album",
            PayloadKind::Song => "song",
            PayloadKind::NewUser => "new_user",
            PayloadKind::Login => "login",
            PayloadKind::RefreshToken => "refresh_token",
            PayloadKind::Playlist => "playlist",
            PayloadKind::PlaylistSong => "playlist_song",
            PayloadKind::Collaboration => "collaboration",
            PayloadKind::Export => "export",
            PayloadKind::AlbumCover => "album_cover",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from payload kind to validator.
///
/// Built once at startup and shared by reference; there is no global lookup.
#[derive(Default)]
pub struct SchemaRegistry {
    validators: HashMap<PayloadKind, Box<dyn Validate>>,
}

impl SchemaRegistry {
    /// A registry with nothing registered
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every catalog schema compiled and registered.
    ///
    /// A schema that fails to compile is logged and left out, so payloads
    /// of that kind fail as server faults.
    pub fn standard() -> Self {
        PayloadKind::ALL
            .into_iter()
            .fold(Self::new(), |registry, kind| {
                match JsonSchema::compile(&schemas::definition(kind)) {
                    Ok(schema) => registry.with(kind, schema),
                    Err(e) => {
                        tracing::error!("Failed to compile {} schema: {}", kind, e);
                        registry
                    }
                }
            })
    }

    /// Register (or replace) the validator for `kind`
    pub fn with(mut self, kind: PayloadKind, validator: impl Validate + 'static) -> Self {
        self.validators.insert(kind, Box::new(validator));
        self
    }

    pub fn contains(&self, kind: PayloadKind) -> bool {
        self.validators.contains_key(&kind)
    }

    /// Run the validator for `kind`; `None` if nothing is registered
    pub fn check(&self, kind: PayloadKind, payload: &Value) -> Option<ValidationResult> {
        self.validators
            .get(&kind)
            .map(|validator| validator.validate(payload))
    }

    /// Validate `payload`, failing with a 400 client fault carrying the
    /// schema's reason.
    ///
    /// An unregistered kind is a wiring bug, reported as a server fault.
    pub fn validate_payload(&self, kind: PayloadKind, payload: &Value) -> Result<()> {
        match self.check(kind, payload) {
            Some(ValidationResult::Valid) => Ok(()),
            Some(ValidationResult::Invalid(reason)) => Err(Fault::bad_request(reason)),
            None => {
                tracing::error!("No schema registered for payload kind {}", kind);
                Err(Fault::server(format!(
                    "No schema registered for payload kind {kind}"
                )))
            }
        }
    }

    /// Validate `payload` and deserialize it into `T`
    pub fn parse<T: DeserializeOwned>(&self, kind: PayloadKind, payload: Value) -> Result<T> {
        self.validate_payload(kind, &payload)?;
        serde_json::from_value(payload)
            .map_err(|e| Fault::bad_request(format!("Invalid {kind} payload: {e}")))
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.validators.keys().map(PayloadKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("SchemaRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewAlbum;
    use serde_json::json;

    #[test]
    fn standard_registry_covers_every_kind() {
        let registry = SchemaRegistry::standard();
        for kind in PayloadKind::ALL {
            assert!(registry.contains(kind), "missing schema for {kind}");
        }
    }

    #[test]
    fn valid_payload_passes() {
        let registry = SchemaRegistry::standard();
        let result = registry.validate_payload(
            PayloadKind::Album,
            &json!({ "name": "Viva la Vida", "year": 2008 }),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn invalid_payload_becomes_bad_request() {
        let registry = SchemaRegistry::standard();
        let fault = registry
            .validate_payload(PayloadKind::Album, &json!({ "title": "" }))
            .unwrap_err();

        assert_eq!(fault, Fault::bad_request("\"name\" is required"));
        assert_eq!(fault.status_code(), 400);
    }

    #[test]
    fn every_schema_failure_is_a_400() {
        let registry = SchemaRegistry::standard();
        for kind in PayloadKind::ALL {
            let fault = registry
                .validate_payload(kind, &json!("not an object"))
                .unwrap_err();
            assert!(fault.is_client());
            assert_eq!(fault.status_code(), 400, "{kind}");
        }
    }

    #[test]
    fn unregistered_kind_fails_loudly() {
        let registry = SchemaRegistry::new().with(
            PayloadKind::Album,
            JsonSchema::compile(&schemas::album()).unwrap(),
        );
        let fault = registry
            .validate_payload(PayloadKind::Song, &json!({}))
            .unwrap_err();

        assert!(!fault.is_client());
        assert_eq!(fault.status_code(), 500);
    }

    #[test]
    fn closures_can_be_registered() {
        let registry = SchemaRegistry::new().with(PayloadKind::Playlist, |payload: &Value| {
            if payload.get("name").is_some() {
                ValidationResult::Valid
            } else {
                ValidationResult::Invalid("name please".to_string())
            }
        });

        assert!(registry
            .validate_payload(PayloadKind::Playlist, &json!({ "name": "x" }))
            .is_ok());
        assert_eq!(
            registry.validate_payload(PayloadKind::Playlist, &json!({})),
            Err(Fault::bad_request("name please"))
        );
    }

    #[test]
    fn parse_returns_typed_payload() {
        let registry = SchemaRegistry::standard();
        let album: NewAlbum = registry
            .parse(PayloadKind::Album, json!({ "name": "Ghost Stories", "year": 2014 }))
            .unwrap();
        assert_eq!(album.name, "Ghost Stories");
        assert_eq!(album.year, 2014);
    }
}
