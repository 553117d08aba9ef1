//! Cart line items.
//!
//! A [`CartLines`] list is the client's cached copy of a remote cart. The
//! remote cart is the system of record; these helpers only apply the local
//! edits that mirror a successful remote write.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::VariantId;
use super::price::{CurrencyCode, Price};

/// A single line in a cart, keyed by variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Purchased variant.
    pub variant_id: VariantId,
    /// Display name.
    pub name: String,
    /// Price of a single unit.
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Currency of `unit_price`.
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Number of units, at least 1.
    pub quantity: u32,
    /// Image shown next to the line.
    pub image_url: String,
    /// Slug of the parent product, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_slug: Option<String>,
}

impl CartLine {
    /// Unit price with currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::new(self.unit_price, self.currency)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price().times(self.quantity)
    }
}

/// Ordered list of cart lines with at most one line per variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLines(Vec<CartLine>);

impl CartLines {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Merge a line into the list.
    ///
    /// If the variant is already present its quantity is incremented,
    /// otherwise the line is appended.
    pub fn merge(&mut self, line: CartLine) {
        if let Some(existing) = self.find_mut(&line.variant_id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.0.push(line);
        }
    }

    /// Rewrite the quantity of a variant's line, never going below 1.
    ///
    /// Returns `false` if the variant is not in the list.
    pub fn set_quantity(&mut self, variant_id: &VariantId, quantity: u32) -> bool {
        self.find_mut(variant_id).is_some_and(|line| {
            line.quantity = quantity.max(1);
            true
        })
    }

    /// Remove a variant's line. Returns the removed line, if any.
    pub fn remove(&mut self, variant_id: &VariantId) -> Option<CartLine> {
        let index = self.0.iter().position(|l| &l.variant_id == variant_id)?;
        Some(self.0.remove(index))
    }

    /// Look up a variant's line.
    #[must_use]
    pub fn get(&self, variant_id: &VariantId) -> Option<&CartLine> {
        self.0.iter().find(|l| &l.variant_id == variant_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.0
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of line totals.
    ///
    /// Uses the first line's currency; an empty list totals zero in `fallback`.
    #[must_use]
    pub fn subtotal(&self, fallback: CurrencyCode) -> Price {
        let currency = self.0.first().map_or(fallback, |l| l.currency);
        let amount = self.0.iter().map(|l| l.line_total().amount).sum();
        Price::new(amount, currency)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate over lines in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.0.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn find_mut(&mut self, variant_id: &VariantId) -> Option<&mut CartLine> {
        self.0.iter_mut().find(|l| &l.variant_id == variant_id)
    }
}

impl From<Vec<CartLine>> for CartLines {
    fn from(lines: Vec<CartLine>) -> Self {
        let mut merged = Self::new();
        for line in lines {
            merged.merge(line);
        }
        merged
    }
}

impl FromIterator<CartLine> for CartLines {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a CartLines {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(variant: &str, cents: i64, quantity: u32) -> CartLine {
        CartLine {
            variant_id: VariantId::new(variant),
            name: format!("Item {variant}"),
            unit_price: Decimal::new(cents, 2),
            currency: CurrencyCode::USD,
            quantity,
            image_url: format!("/images/{variant}.jpg"),
            product_slug: None,
        }
    }

    #[test]
    fn test_merge_increments_existing_variant() {
        let mut lines = CartLines::new();
        lines.merge(line("tee-m", 3499, 1));
        lines.merge(line("tee-m", 3499, 2));

        assert_eq!(lines.len(), 1);
        assert_eq!(lines.get(&VariantId::new("tee-m")).map(|l| l.quantity), Some(3));
    }

    #[test]
    fn test_merge_appends_new_variant_in_order() {
        let mut lines = CartLines::new();
        lines.merge(line("tee-m", 3499, 1));
        lines.merge(line("hoodie-l", 5999, 1));

        let order: Vec<&str> = lines.iter().map(|l| l.variant_id.as_str()).collect();
        assert_eq!(order, ["tee-m", "hoodie-l"]);
    }

    #[test]
    fn test_set_quantity_floors_at_one() {
        let mut lines = CartLines::from(vec![line("cap", 2499, 4)]);

        assert!(lines.set_quantity(&VariantId::new("cap"), 0));
        assert_eq!(lines.item_count(), 1);

        assert!(!lines.set_quantity(&VariantId::new("missing"), 5));
    }

    #[test]
    fn test_remove() {
        let mut lines = CartLines::from(vec![line("cap", 2499, 1), line("mug", 1899, 2)]);

        let removed = lines.remove(&VariantId::new("cap"));
        assert_eq!(removed.map(|l| l.name), Some("Item cap".to_string()));
        assert_eq!(lines.len(), 1);
        assert!(lines.remove(&VariantId::new("cap")).is_none());
    }

    #[test]
    fn test_item_count_and_subtotal() {
        let lines = CartLines::from(vec![line("tee", 3499, 2), line("mug", 1899, 1)]);

        assert_eq!(lines.item_count(), 3);
        assert_eq!(lines.subtotal(CurrencyCode::EUR).display(), "$88.97");
    }

    #[test]
    fn test_empty_subtotal_uses_fallback_currency() {
        let lines = CartLines::new();
        assert_eq!(lines.subtotal(CurrencyCode::GBP).display(), "£0.00");
    }

    #[test]
    fn test_from_vec_collapses_duplicate_variants() {
        let lines: CartLines = vec![line("tee", 3499, 1), line("tee", 3499, 1)]
            .into_iter()
            .collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.item_count(), 2);
    }
}
