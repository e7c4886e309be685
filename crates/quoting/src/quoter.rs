use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quotedesk_core::{LineId, QuoterId};

/// Customer the quotation is addressed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: LineId,
    pub name: String,
    pub location: String,
    pub email: String,
    pub phone_number: i64,
}

/// A quoted service (labour, maintenance, installation...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLine {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: LineId,
    pub name: String,
    pub description: String,
    pub client_price: f64,
    pub real_price: f64,
}

/// A quoted catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: LineId,
    pub title: String,
    pub list_price: f64,
    pub discount_price: f64,
    pub image: String,
    pub stock_number: i64,
    pub brand: String,
    pub product_id: i64,
    pub model: String,
    pub sat_key: i64,
    pub weight: f64,
}

/// A price quotation document.
///
/// Mutable until a [`Sale`](crate::Sale) references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quoter {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: QuoterId,
    pub name: String,
    pub date: DateTime<Utc>,
    pub subtotal: f64,
    /// Tax amount.
    pub iva: f64,
    pub total: f64,
    pub percentage_in_advance_pay: f64,
    pub revenue_percentage: f64,
    pub first_pay: f64,
    pub second_pay: f64,
    pub description: String,
    pub client: Client,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
    #[serde(default)]
    pub products: Vec<ProductLine>,
}

impl Quoter {
    /// Consume the quoter and return it with `patch` applied.
    pub fn patched(mut self, patch: &QuoterPatch) -> Self {
        patch.apply_to(&mut self);
        self
    }
}

/// Partial quoter update.
///
/// Every field is optional; `None` means "leave untouched". Embedded lists are
/// replaced wholesale when present. Absent fields are also skipped on
/// serialization so the patch can be merged into a stored document as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iva: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_in_advance_pay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_pay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_pay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceLine>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductLine>>,
}

impl QuoterPatch {
    /// Overwrite every field of `quoter` that is set in this patch.
    pub fn apply_to(&self, quoter: &mut Quoter) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }

        set(&mut quoter.name, &self.name);
        set(&mut quoter.date, &self.date);
        set(&mut quoter.subtotal, &self.subtotal);
        set(&mut quoter.iva, &self.iva);
        set(&mut quoter.total, &self.total);
        set(&mut quoter.percentage_in_advance_pay, &self.percentage_in_advance_pay);
        set(&mut quoter.revenue_percentage, &self.revenue_percentage);
        set(&mut quoter.first_pay, &self.first_pay);
        set(&mut quoter.second_pay, &self.second_pay);
        set(&mut quoter.description, &self.description);
        set(&mut quoter.client, &self.client);
        set(&mut quoter.services, &self.services);
        set(&mut quoter.products, &self.products);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    pub(crate) fn sample_quoter() -> Quoter {
        Quoter {
            id: QuoterId::new(),
            name: "Office network".to_string(),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            subtotal: 1000.0,
            iva: 160.0,
            total: 1160.0,
            percentage_in_advance_pay: 50.0,
            revenue_percentage: 30.0,
            first_pay: 580.0,
            second_pay: 580.0,
            description: "Cabling and two access points".to_string(),
            client: Client {
                id: LineId::new(),
                name: "ACME".to_string(),
                location: "Monterrey".to_string(),
                email: "ops@acme.test".to_string(),
                phone_number: 5512345678,
            },
            services: vec![ServiceLine {
                id: LineId::new(),
                name: "Mantenimiento".to_string(),
                description: "Mantenimiento preventivo y correctivo".to_string(),
                client_price: 522.0,
                real_price: 200.0,
            }],
            products: vec![ProductLine {
                id: LineId::new(),
                title: "Access point AC1200".to_string(),
                list_price: 120.0,
                discount_price: 99.0,
                image: "https://cdn.test/ap.png".to_string(),
                stock_number: 14,
                brand: "Ubiquiti".to_string(),
                product_id: 4411,
                model: "U6-Lite".to_string(),
                sat_key: 43222600,
                weight: 0.3,
            }],
        }
    }

    #[test]
    fn patch_overwrites_only_set_fields() {
        let quoter = sample_quoter();
        let patch = QuoterPatch {
            total: Some(500.0),
            ..Default::default()
        };

        let patched = quoter.clone().patched(&patch);

        assert_eq!(patched.total, 500.0);
        assert_eq!(patched.name, quoter.name);
        assert_eq!(patched.subtotal, quoter.subtotal);
        assert_eq!(patched.services, quoter.services);
        assert_eq!(patched.id, quoter.id);
    }

    #[test]
    fn patch_replaces_embedded_lists_wholesale() {
        let quoter = sample_quoter();
        let patch = QuoterPatch {
            services: Some(vec![]),
            ..Default::default()
        };

        let patched = quoter.clone().patched(&patch);

        assert!(patched.services.is_empty());
        assert_eq!(patched.products, quoter.products);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let quoter = sample_quoter();
        let patch = QuoterPatch::default();
        assert_eq!(quoter.clone().patched(&patch), quoter);
    }

    #[test]
    fn patch_serialization_omits_unset_fields() {
        let patch = QuoterPatch {
            name: Some("x".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "x" }));
    }

    #[test]
    fn quoter_accepts_missing_ids_and_lists() {
        let json = serde_json::json!({
            "name": "Minimal",
            "date": "2024-03-01T12:00:00Z",
            "subtotal": 1.0,
            "iva": 0.16,
            "total": 1.16,
            "percentage_in_advance_pay": 50.0,
            "revenue_percentage": 10.0,
            "first_pay": 0.58,
            "second_pay": 0.58,
            "description": "",
            "client": {
                "name": "ACME",
                "location": "MTY",
                "email": "a@b.c",
                "phone_number": 1
            }
        });

        let quoter: Quoter = serde_json::from_value(json).unwrap();
        assert!(quoter.services.is_empty());
        assert!(quoter.products.is_empty());

        let back = serde_json::to_value(&quoter).unwrap();
        assert_eq!(back["_id"], serde_json::Value::String(quoter.id.to_string()));
    }

    proptest! {
        #[test]
        fn unset_fields_survive_any_patch(
            name in proptest::option::of("[a-z]{0,12}"),
            total in proptest::option::of(0.0f64..1_000_000.0),
            description in proptest::option::of(".{0,24}"),
        ) {
            let quoter = sample_quoter();
            let patch = QuoterPatch {
                name: name.clone(),
                total,
                description: description.clone(),
                ..Default::default()
            };

            let patched = quoter.clone().patched(&patch);

            prop_assert_eq!(patched.name, name.unwrap_or(quoter.name));
            prop_assert_eq!(patched.total, total.unwrap_or(quoter.total));
            prop_assert_eq!(patched.description, description.unwrap_or(quoter.description));
            prop_assert_eq!(patched.subtotal, quoter.subtotal);
            prop_assert_eq!(patched.client, quoter.client);
            prop_assert_eq!(patched.products, quoter.products);
        }
    }
}
