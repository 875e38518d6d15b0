//! Newtype IDs for type-safe document references.
//!
//! Content store document ids are opaque strings (e.g. `"drafts.abc123"` or a
//! UUID). Use the `define_id!` macro to create wrappers that prevent
//! accidentally mixing ids from different document types.

/// Macro to define a type-safe document ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use kiyone_core::define_id;
/// define_id!(AuthorId);
/// define_id!(CategoryId);
///
/// let author = AuthorId::new("author-1");
/// let category = CategoryId::new("author-1");
///
/// // These are different types, so this won't compile:
/// // let _: AuthorId = category;
/// assert_eq!(author.as_str(), category.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a document id string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying document id.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Content store document types
define_id!(PostId);
define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_is_raw_document_id() {
        let id = ProductId::new("3f1c0b6e-product");
        assert_eq!(id.to_string(), "3f1c0b6e-product");
        assert_eq!(id.as_str(), "3f1c0b6e-product");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = PostId::from("post-1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"post-1\"");

        let back: PostId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
