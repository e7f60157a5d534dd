// src/normalize/mod.rs

mod fields;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Sentinel for a string leaf that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Address used when the seller could not be named: unnamed sellers are
/// treated as online marketplaces.
pub const ONLINE_SELLER: &str = "Online Seller";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub invoice_no: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerDetails {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedTo {
    pub name: String,
    pub address: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: f64,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
}

/// The canonical record every extraction resolves to. Every leaf is
/// always present: unresolved strings hold `"N/A"`, unresolved amounts
/// hold `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceData {
    pub invoice_details: InvoiceDetails,
    pub seller_details: SellerDetails,
    pub issued_to: IssuedTo,
    pub summary: Summary,
}

impl InvoiceData {
    /// How many leaves resolved to something other than their defaults
    /// (out of all eleven). Logging aid only.
    pub fn coverage(&self) -> (usize, usize) {
        let total = 11;
        let filled = [
            self.invoice_details.invoice_no != NOT_AVAILABLE,
            self.invoice_details.date != NOT_AVAILABLE,
            self.seller_details.name != NOT_AVAILABLE,
            self.seller_details.address != NOT_AVAILABLE
                && self.seller_details.address != ONLINE_SELLER,
            self.issued_to.name != NOT_AVAILABLE,
            self.issued_to.address != NOT_AVAILABLE,
            self.issued_to.email != NOT_AVAILABLE,
            self.summary.total != 0.0,
            self.summary.subtotal != 0.0,
            self.summary.tax != 0.0,
            self.summary.shipping != 0.0,
        ]
        .iter()
        .filter(|&&v| v)
        .count();
        (filled, total)
    }
}

/// Map an arbitrarily-shaped extraction result onto the canonical record.
///
/// Pure and infallible: unknown shapes, missing fields, and wrong types
/// all degrade to the leaf defaults rather than erroring, so a partly
/// recognized document still renders as a complete (if placeholder-heavy)
/// record. Field resolution is order-independent across calls.
pub fn normalize(raw: &Value) -> InvoiceData {
    fields::resolve(raw)
}
