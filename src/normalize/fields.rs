use super::{
    InvoiceData, InvoiceDetails, IssuedTo, SellerDetails, Summary, NOT_AVAILABLE, ONLINE_SELLER,
};
use regex::Regex;
use serde_json::Value;

/// Resolve every canonical leaf from the raw extraction result.
pub(super) fn resolve(raw: &Value) -> InvoiceData {
    let seller_name = resolve_string(raw, SELLER_NAME);
    let seller_address = seller_address(raw, &seller_name);
    InvoiceData {
        invoice_details: InvoiceDetails {
            invoice_no: resolve_string(raw, INVOICE_NO),
            date: resolve_string(raw, INVOICE_DATE),
        },
        seller_details: SellerDetails {
            name: seller_name,
            address: seller_address,
        },
        issued_to: IssuedTo {
            name: resolve_string(raw, ISSUED_TO_NAME),
            address: issued_to_address(raw),
            email: resolve_string(raw, ISSUED_TO_EMAIL),
        },
        summary: Summary {
            total: resolve_number(raw, TOTAL),
            subtotal: resolve_number(raw, SUBTOTAL),
            tax: resolve_number(raw, TAX),
            shipping: resolve_number(raw, SHIPPING),
        },
    }
}

// ---------------------------------------------------------------------------
// Candidate tables — ordered aliases per target leaf, earliest wins
// ---------------------------------------------------------------------------

const INVOICE_NO: &[&[&str]] = &[
    &["invoice_details", "invoice_no"],
    &["invoice_details", "invoice_number"],
    &["order_details", "order_number"],
    &["order_number"],
];

const INVOICE_DATE: &[&[&str]] = &[
    &["invoice_details", "date"],
    &["invoice_details", "invoice_date"],
    &["order_details", "order_placed_date"],
    &["order_details", "order_date"],
    &["date"],
];

const SELLER_NAME: &[&[&str]] = &[
    &["seller_details", "name"],
    &["sold_by", "name"],
    &["seller_details", "seller_name"],
    &["order_details", "sold_by"],
    &["sold_by"],
];

const SELLER_ADDRESS_RAW: &[&[&str]] = &[
    &["seller_details", "address"],
    &["sold_by", "address"],
    &["seller_details", "name"],
    &["order_details", "sold_by"],
    &["sold_by"],
];

const ISSUED_TO_NAME: &[&[&str]] = &[
    &["issued_to", "name"],
    &["shipping_address", "name"],
    &["order_details", "shipping_address", "name"],
    &["billing_address", "name"],
];

const ISSUED_TO_ADDRESS_RAW: &[&[&str]] = &[
    &["issued_to", "address"],
    &["billing_address", "address"],
    &["shipping_address", "address"],
    &["sold_to", "address"],
    &["buyer", "address"],
];

/// Address-like objects handed to `format_address` in the first pass.
const ISSUED_TO_ADDRESS_FORMATTED: &[&[&str]] = &[
    &["shipping_address"],
    &["shipping_address", "address"],
    &["billing_address", "address"],
    &["buyer", "address"],
    &["issued_to", "address"],
    &["sold_to", "address"],
    &["order_details", "shipping_address"],
];

/// Whole source objects scanned fragment-by-fragment in the second pass.
const ISSUED_TO_ADDRESS_SOURCES: &[&[&str]] = &[
    &["billing_address"],
    &["shipping_address"],
    &["issued_to"],
    &["sold_to"],
    &["buyer"],
    &["order_details", "shipping_address"],
];

const ISSUED_TO_EMAIL: &[&[&str]] = &[
    &["issued_to", "email"],
    &["shipping_address", "email"],
    &["order_details", "shipping_address", "email"],
    &["billing_address", "email"],
];

const TOTAL: &[&[&str]] = &[
    &["summary", "total"],
    &["total", "total_amount"],
    &["order_summary", "total"],
    &["payment_summary", "total"],
];

const SUBTOTAL: &[&[&str]] = &[
    &["summary", "subtotal"],
    &["order_summary", "subtotal"],
    &["payment_summary", "subtotal"],
];

const TAX: &[&[&str]] = &[
    &["summary", "tax"],
    &["total", "tax_amount"],
    &["total", "tax"],
    &["order_summary", "est_tax"],
    &["payment_summary", "estimated_tax"],
];

const SHIPPING: &[&[&str]] = &[
    &["summary", "shipping"],
    &["order_summary", "value_shipping"],
    &["payment_summary", "value_shipping"],
];

// ---------------------------------------------------------------------------
// First-valid-wins machinery
// ---------------------------------------------------------------------------

/// Walk a path of object keys. A missing key and an explicit JSON `null`
/// both resolve to `None`; everything else is a hit, including `0`,
/// `false`, and the empty string.
fn get_path<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = raw;
    for key in path {
        current = current.get(key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// First candidate path that resolves to a scalar.
fn try_resolve_string(raw: &Value, candidates: &[&[&str]]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|path| get_path(raw, path))
        .find_map(scalar_to_string)
}

fn resolve_string(raw: &Value, candidates: &[&[&str]]) -> String {
    try_resolve_string(raw, candidates).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Amounts pass through as numbers. A winning candidate that is neither
/// numeric nor a numeric string still ends resolution (first valid wins);
/// the leaf then keeps its `0` default. No currency or locale handling.
fn resolve_number(raw: &Value, candidates: &[&[&str]]) -> f64 {
    for path in candidates {
        let Some(value) = get_path(raw, path) else {
            continue;
        };
        if let Some(n) = value.as_f64() {
            return n;
        }
        if let Some(n) = value.as_str().and_then(|s| s.trim().parse::<f64>().ok()) {
            return n;
        }
        return 0.0;
    }
    0.0
}

// ---------------------------------------------------------------------------
// Address composition
// ---------------------------------------------------------------------------

const STREET_KEYS: &[&str] = &["street", "address_line1", "address1", "line1"];
const LINE2_KEYS: &[&str] = &["address_line2", "address2", "unit", "po_box"];
const ZIP_KEYS: &[&str] = &["zip", "postal_code", "postcode"];

/// First non-empty value among aliased keys of one address object,
/// trimmed. Numeric values (bare zip codes) are stringified.
fn fragment(addr: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| addr.get(*key))
        .find_map(|value| match value {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Compose a postal address from the fragments of an address-like object.
///
/// Fragments are gathered in display order, then de-duplicated: a
/// fragment whose lowercase text is contained in (or contains) an
/// already-kept one is dropped, which collapses line-2 fields that repeat
/// the full city/state/zip. Survivors join with `", "`; stray comma runs
/// from empty joins are collapsed afterwards.
fn format_address(addr: Option<&Value>) -> String {
    let Some(addr) = addr else {
        return NOT_AVAILABLE.to_string();
    };
    if !addr.is_object() {
        return NOT_AVAILABLE.to_string();
    }

    let parts: Vec<String> = [
        fragment(addr, STREET_KEYS),
        fragment(addr, LINE2_KEYS),
        fragment(addr, &["city"]),
        fragment(addr, &["state"]),
        fragment(addr, ZIP_KEYS),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let mut condensed: Vec<String> = Vec::new();
    for part in parts {
        let lower = part.to_lowercase();
        let duplicate = condensed.iter().any(|kept| {
            let kept_lower = kept.to_lowercase();
            kept_lower.contains(&lower) || lower.contains(&kept_lower)
        });
        if !duplicate {
            condensed.push(part);
        }
    }

    let joined = condensed.join(", ");
    let joined = Regex::new(r"\s+,").unwrap().replace_all(&joined, ",");
    let joined = Regex::new(r",+\s*,").unwrap().replace_all(&joined, ",");
    joined.trim().to_string()
}

/// Seller address. An unnamed seller is assumed to be an online
/// marketplace, regardless of any address fields in the raw object.
fn seller_address(raw: &Value, seller_name: &str) -> String {
    if seller_name == NOT_AVAILABLE {
        return ONLINE_SELLER.to_string();
    }
    if let Some(address) = try_resolve_string(raw, SELLER_ADDRESS_RAW) {
        return address;
    }
    for source in [&["seller_details"][..], &["order_details", "sold_by_address"][..]] {
        let formatted = format_address(get_path(raw, source));
        if formatted != NOT_AVAILABLE {
            return formatted;
        }
    }
    ONLINE_SELLER.to_string()
}

/// Issued-to address. Pass 1: first-valid-wins across raw string fields,
/// then across formatted address objects. Pass 2 (only when pass 1 yields
/// nothing): take the first whole source object with at least one
/// non-empty fragment and join its fragments verbatim, no de-duplication.
fn issued_to_address(raw: &Value) -> String {
    let first_pass = try_resolve_string(raw, ISSUED_TO_ADDRESS_RAW).or_else(|| {
        ISSUED_TO_ADDRESS_FORMATTED
            .iter()
            .map(|path| format_address(get_path(raw, path)))
            .find(|formatted| formatted != NOT_AVAILABLE)
    });
    if let Some(address) = first_pass {
        if address != NOT_AVAILABLE {
            return address;
        }
    }

    for path in ISSUED_TO_ADDRESS_SOURCES {
        let Some(source) = get_path(raw, path) else {
            continue;
        };
        let fragments: Vec<String> = [
            fragment(source, &["street", "address_line1", "address1"]),
            fragment(source, &["address_line2"]),
            fragment(source, &["city"]),
            fragment(source, &["state"]),
            fragment(source, ZIP_KEYS),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !fragments.is_empty() {
            return fragments.join(", ");
        }
    }

    NOT_AVAILABLE.to_string()
}
