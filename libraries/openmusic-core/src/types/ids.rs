/// ID types for OpenMusic entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, Sqlite, Type,
};

/// Declares a string-backed identifier whose generated values carry `prefix`.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random id
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "-{}"), Uuid::new_v4().simple()))
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        #[cfg(feature = "sqlx")]
        impl Type<Sqlite> for $name {
            fn type_info() -> SqliteTypeInfo {
                <String as Type<Sqlite>>::type_info()
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                args: &mut Vec<SqliteArgumentValue<'q>>,
            ) -> Result<IsNull, BoxDynError> {
                <String as Encode<Sqlite>>::encode_by_ref(&self.0, args)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <String as Decode<Sqlite>>::decode(value)?;
                Ok($name(s))
            }
        }
    };
}

entity_id!(
    /// Album identifier
    AlbumId,
    "album"
);

entity_id!(
    /// Song identifier
    SongId,
    "song"
);

entity_id!(
    /// User identifier
    UserId,
    "user"
);

entity_id!(
    /// Playlist identifier
    PlaylistId,
    "playlist"
);

entity_id!(
    /// Collaboration identifier
    CollaborationId,
    "collab"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let id1 = AlbumId::generate();
        let id2 = AlbumId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn generated_ids_carry_prefix() {
        assert!(AlbumId::generate().as_str().starts_with("album-"));
        assert!(SongId::generate().as_str().starts_with("song-"));
        assert!(UserId::generate().as_str().starts_with("user-"));
        assert!(PlaylistId::generate().as_str().starts_with("playlist-"));
        assert!(CollaborationId::generate().as_str().starts_with("collab-"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = SongId::new("song-abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"song-abc\"");
        let back: SongId = serde_json::from_str("\"song-abc\"").unwrap();
        assert_eq!(back, id);
    }
}
