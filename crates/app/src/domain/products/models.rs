//! Product Models

use serde::Deserialize;

use crate::ids::TypedId;

/// Product Id
pub type ProductId = TypedId<Product>;

/// Product Model
///
/// Reference data owned by the catalog service; the cart never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: ProductId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub slug: String,

    /// Unit price in cents.
    #[serde(deserialize_with = "price::deserialize")]
    pub price: u64,

    #[serde(default)]
    pub short_description: Option<String>,

    #[serde(default)]
    pub usage: Option<String>,

    #[serde(default)]
    pub warnings: Option<String>,

    /// Image path relative to the API origin.
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Stand-in used when display data for `id` is not available.
    #[must_use]
    pub fn placeholder(id: ProductId) -> Self {
        Self {
            id,
            name: String::new(),
            slug: String::new(),
            price: 0,
            short_description: None,
            usage: None,
            warnings: None,
            image: None,
        }
    }
}

/// Prices travel as decimal currency units (`8.90`) and are held as cents.
pub(crate) mod price {
    use rust_decimal::{Decimal, prelude::ToPrimitive};
    use serde::{Deserialize, Deserializer, de::Error as _};

    /// Convert currency units to cents, rounding half away from zero.
    pub(crate) fn to_minor_units(major: Decimal) -> Option<u64> {
        (major * Decimal::ONE_HUNDRED).round().to_u64()
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let major: Decimal = rust_decimal::serde::float::deserialize(deserializer)?;

        to_minor_units(major).ok_or_else(|| D::Error::custom(format!("invalid price {major}")))
    }

    pub(crate) fn deserialize_optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Option::<Decimal>::deserialize(deserializer)?
            .map(|major| {
                to_minor_units(major)
                    .ok_or_else(|| D::Error::custom(format!("invalid price {major}")))
            })
            .transpose()
    }
}
