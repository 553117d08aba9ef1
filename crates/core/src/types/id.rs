//! Newtype IDs for type-safe entity references.
//!
//! Fourthwall identifies carts, products, and variants with opaque strings.
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! passing a cart ID where a variant ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use artificial_wearables_core::define_id;
/// define_id!(CartId);
/// define_id!(VariantId);
///
/// let cart_id = CartId::new("cart_123");
/// let variant_id = VariantId::new("cart_123");
///
/// // These are different types, so this won't compile:
/// // let _: CartId = variant_id;
/// assert_eq!(cart_id.as_str(), variant_id.as_str());
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
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID, returning the underlying string.
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(CartId);
define_id!(ProductId);
define_id!(VariantId);
define_id!(CollectionId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = CartId::new("cart_abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cart_abc\"");

        let parsed: VariantId = serde_json::from_str("\"var_1\"").unwrap();
        assert_eq!(parsed, VariantId::new("var_1"));
    }

    #[test]
    fn test_id_display_and_conversions() {
        let id = ProductId::from("prod_9");
        assert_eq!(id.to_string(), "prod_9");
        assert_eq!(id.as_str(), "prod_9");
        assert_eq!(String::from(id.clone()), "prod_9");
        assert_eq!(id.into_inner(), "prod_9");
    }
}
