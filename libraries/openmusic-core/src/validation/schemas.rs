//! Payload schemas for every request body the catalog accepts

use super::PayloadKind;
use serde_json::{json, Value};

/// Oldest release year accepted for albums and songs
pub const MIN_YEAR: i64 = 1900;

/// Latest release year accepted for albums and songs
pub const MAX_YEAR: i64 = 2100;

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 50;

/// MIME types accepted for album cover uploads
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/apng",
    "image/avif",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/webp",
];

/// Email addresses need a local part, a domain and a dotted TLD
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$";

/// The JSON Schema for `kind`
pub fn definition(kind: PayloadKind) -> Value {
    match kind {
        PayloadKind::Album => album(),
        PayloadKind::Song => song(),
        PayloadKind::NewUser => new_user(),
        PayloadKind::Login => login(),
        PayloadKind::RefreshToken => refresh_token(),
        PayloadKind::Playlist => playlist(),
        PayloadKind::PlaylistSong => playlist_song(),
        PayloadKind::Collaboration => collaboration(),
        PayloadKind::Export => export(),
        PayloadKind::AlbumCover => album_cover(),
    }
}

fn text() -> Value {
    json!({ "type": "string", "minLength": 1 })
}

fn year() -> Value {
    json!({ "type": "integer", "minimum": MIN_YEAR, "maximum": MAX_YEAR })
}

pub fn album() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": text(),
            "year": year(),
        },
        "required": ["name", "year"],
        "additionalProperties": false,
    })
}

pub fn song() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": text(),
            "year": year(),
            "genre": text(),
            "performer": text(),
            "duration": { "type": ["integer", "null"], "minimum": 0 },
            "albumId": { "type": ["string", "null"], "minLength": 1 },
        },
        "required": ["title", "year", "genre", "performer"],
        "additionalProperties": false,
    })
}

pub fn new_user() -> Value {
    json!({
        "type": "object",
        "properties": {
            "username": { "type": "string", "minLength": 1, "maxLength": MAX_USERNAME_LEN },
            "password": text(),
            "fullname": text(),
        },
        "required": ["username", "password", "fullname"],
        "additionalProperties": false,
    })
}

pub fn login() -> Value {
    json!({
        "type": "object",
        "properties": {
            "username": text(),
            "password": text(),
        },
        "required": ["username", "password"],
    })
}

pub fn refresh_token() -> Value {
    json!({
        "type": "object",
        "properties": { "refreshToken": text() },
        "required": ["refreshToken"],
    })
}

pub fn playlist() -> Value {
    json!({
        "type": "object",
        "properties": { "name": text() },
        "required": ["name"],
        "additionalProperties": false,
    })
}

pub fn playlist_song() -> Value {
    json!({
        "type": "object",
        "properties": { "songId": text() },
        "required": ["songId"],
        "additionalProperties": false,
    })
}

pub fn collaboration() -> Value {
    json!({
        "type": "object",
        "properties": {
            "playlistId": text(),
            "userId": text(),
        },
        "required": ["playlistId", "userId"],
        "additionalProperties": false,
    })
}

pub fn export() -> Value {
    json!({
        "type": "object",
        "properties": {
            "targetEmail": {
                "type": "string",
                "minLength": 1,
                "format": "email",
                "pattern": EMAIL_PATTERN,
            },
        },
        "required": ["targetEmail"],
        "additionalProperties": false,
    })
}

/// Validated against the upload part's headers, not a JSON body
pub fn album_cover() -> Value {
    json!({
        "type": "object",
        "properties": {
            "content-type": { "type": "string", "enum": IMAGE_MIME_TYPES },
        },
        "required": ["content-type"],
    })
}
