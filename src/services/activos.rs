//! Asset Records
//!
//! Request shapes for asset registration/update and the normalization applied
//! before anything reaches the store.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const UNSPECIFIED_NAME: &str = "NO ESPECIFICADO";
pub const UNSPECIFIED_BRAND: &str = "NO ESPECIFICADA";
pub const UNSPECIFIED_MODEL: &str = "NO ESPECIFICADO";

/// Asset as posted by clients. Field names follow the inventory export the
/// frontend sends (`ItemCode`, `marca`, `fecha_compra`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewActivo {
    #[serde(rename = "ItemCode")]
    pub item_code: Option<String>,
    #[serde(rename = "ItemName")]
    pub item_name: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub fecha_compra: Option<NaiveDate>,
    #[serde(rename = "Price", default, deserialize_with = "blank_as_none")]
    pub price: Option<Decimal>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "BarCode")]
    pub barcode: Option<String>,
    #[serde(rename = "QuantityOnStock", default, deserialize_with = "blank_as_none")]
    pub quantity_on_stock: Option<i32>,
    #[serde(rename = "ItemsGroupCode", default, deserialize_with = "blank_as_none")]
    pub items_group_code: Option<i32>,
    #[serde(rename = "FechaBaja", default, deserialize_with = "blank_as_none")]
    pub fecha_baja: Option<NaiveDate>,
    #[serde(rename = "MotivoBaja")]
    pub motivo_baja: Option<String>,
}

/// An asset with every default applied, ready for `insertar_activo`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivoRecord {
    pub item_code: Option<String>,
    pub item_name: String,
    pub brand: String,
    pub model: String,
    pub purchase_date: NaiveDate,
    pub price: Decimal,
    pub currency: String,
    pub barcode: Option<String>,
    pub quantity_on_stock: i32,
    pub items_group_code: Option<i32>,
    pub retirement_date: Option<NaiveDate>,
    pub retirement_reason: Option<String>,
}

/// Update payload for `PUT /activos/{id}`. Only the descriptive fields are
/// normalized; everything else is forwarded as sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivoUpdate {
    #[serde(rename = "ItemCode")]
    pub item_code: Option<String>,
    #[serde(rename = "ItemName")]
    pub item_name: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub fecha_compra: Option<NaiveDate>,
    #[serde(rename = "Price", default, deserialize_with = "blank_as_none")]
    pub price: Option<Decimal>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "BarCode")]
    pub barcode: Option<String>,
    #[serde(rename = "QuantityOnStock", default, deserialize_with = "blank_as_none")]
    pub quantity_on_stock: Option<i32>,
    #[serde(rename = "ItemsGroupCode", default, deserialize_with = "blank_as_none")]
    pub items_group_code: Option<i32>,
    #[serde(rename = "FechaBaja", default, deserialize_with = "blank_as_none")]
    pub fecha_baja: Option<NaiveDate>,
    #[serde(rename = "MotivoBaja")]
    pub motivo_baja: Option<String>,
}

/// Asset lifecycle states that may be set through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoActivo {
    Disponible,
    Perdida,
}

impl EstadoActivo {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Disponible" => Some(Self::Disponible),
            "Pérdida" => Some(Self::Perdida),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disponible => "Disponible",
            Self::Perdida => "Pérdida",
        }
    }
}

/// Read an optional typed field where `null` and blank strings mean absent.
///
/// Spreadsheet exports send `""` for empty dates, prices and codes.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(D::Error::custom),
    }
}

/// Upper-case a descriptive field, or fall back to its sentinel when blank.
pub fn upper_or(value: Option<&str>, sentinel: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_uppercase(),
        _ => sentinel.to_string(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl NewActivo {
    /// Apply registration defaults, using `today` for a missing purchase date.
    pub fn normalize(self, today: NaiveDate) -> ActivoRecord {
        ActivoRecord {
            item_name: upper_or(self.item_name.as_deref(), UNSPECIFIED_NAME),
            brand: upper_or(self.marca.as_deref(), UNSPECIFIED_BRAND),
            model: upper_or(self.modelo.as_deref(), UNSPECIFIED_MODEL),
            item_code: self.item_code,
            purchase_date: self.fecha_compra.unwrap_or(today),
            price: self.price.unwrap_or_else(|| Decimal::new(0, 2)),
            currency: non_blank(self.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            barcode: non_blank(self.barcode),
            quantity_on_stock: self.quantity_on_stock.unwrap_or(0),
            items_group_code: self.items_group_code,
            retirement_date: self.fecha_baja,
            retirement_reason: non_blank(self.motivo_baja),
        }
    }
}

impl ActivoUpdate {
    /// Upper-case the descriptive fields, substituting sentinels when blank.
    pub fn normalize(mut self) -> Self {
        self.item_name = Some(upper_or(self.item_name.as_deref(), UNSPECIFIED_NAME));
        self.marca = Some(upper_or(self.marca.as_deref(), UNSPECIFIED_BRAND));
        self.modelo = Some(upper_or(self.modelo.as_deref(), UNSPECIFIED_MODEL));
        self
    }
}

/// Current date in UTC, the default purchase date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let today = date("2025-03-14");
        let record = NewActivo {
            item_code: Some("A1".to_string()),
            ..Default::default()
        }
        .normalize(today);

        assert_eq!(record.item_code.as_deref(), Some("A1"));
        assert_eq!(record.item_name, "NO ESPECIFICADO");
        assert_eq!(record.brand, "NO ESPECIFICADA");
        assert_eq!(record.model, "NO ESPECIFICADO");
        assert_eq!(record.purchase_date, today);
        assert_eq!(record.price, Decimal::ZERO);
        assert_eq!(record.currency, "USD");
        assert_eq!(record.quantity_on_stock, 0);
        assert_eq!(record.barcode, None);
        assert_eq!(record.items_group_code, None);
        assert_eq!(record.retirement_date, None);
        assert_eq!(record.retirement_reason, None);
    }

    #[test]
    fn test_normalize_uppercases_and_keeps_values() {
        let record = NewActivo {
            item_code: Some("LT-001".to_string()),
            item_name: Some("laptop".to_string()),
            marca: Some("  dell ".to_string()),
            modelo: Some("latitude 5440".to_string()),
            fecha_compra: Some(date("2024-11-02")),
            price: Some(Decimal::new(129999, 2)),
            currency: Some("PEN".to_string()),
            barcode: Some("7750001".to_string()),
            quantity_on_stock: Some(3),
            items_group_code: Some(101),
            fecha_baja: None,
            motivo_baja: Some("".to_string()),
        }
        .normalize(date("2025-01-01"));

        assert_eq!(record.item_name, "LAPTOP");
        assert_eq!(record.brand, "DELL");
        assert_eq!(record.model, "LATITUDE 5440");
        assert_eq!(record.purchase_date, date("2024-11-02"));
        assert_eq!(record.price, Decimal::new(129999, 2));
        assert_eq!(record.currency, "PEN");
        assert_eq!(record.barcode.as_deref(), Some("7750001"));
        assert_eq!(record.quantity_on_stock, 3);
        assert_eq!(record.items_group_code, Some(101));
        assert_eq!(record.retirement_reason, None);
    }

    #[test]
    fn test_blank_descriptive_fields_use_sentinels() {
        let record = NewActivo {
            item_name: Some("   ".to_string()),
            marca: Some("".to_string()),
            modelo: Some("\t".to_string()),
            currency: Some(" ".to_string()),
            ..Default::default()
        }
        .normalize(date("2025-01-01"));

        assert_eq!(record.item_name, UNSPECIFIED_NAME);
        assert_eq!(record.brand, UNSPECIFIED_BRAND);
        assert_eq!(record.model, UNSPECIFIED_MODEL);
        assert_eq!(record.currency, DEFAULT_CURRENCY);
    }

    #[test]
    fn test_deserialize_export_field_names() {
        let activo: NewActivo = serde_json::from_value(serde_json::json!({
            "ItemCode": "A7",
            "ItemName": "Monitor",
            "fecha_compra": "2024-05-20",
            "Price": 250.5,
            "QuantityOnStock": 2
        }))
        .unwrap();

        assert_eq!(activo.item_code.as_deref(), Some("A7"));
        assert_eq!(activo.item_name.as_deref(), Some("Monitor"));
        assert_eq!(activo.fecha_compra, Some(date("2024-05-20")));
        assert_eq!(activo.price, Some(Decimal::new(2505, 1)));
        assert_eq!(activo.quantity_on_stock, Some(2));
    }

    #[test]
    fn test_blank_typed_fields_are_absent() {
        let activo: NewActivo = serde_json::from_value(serde_json::json!({
            "ItemCode": "A2",
            "fecha_compra": "",
            "Price": "",
            "QuantityOnStock": " ",
            "ItemsGroupCode": "",
            "FechaBaja": null
        }))
        .unwrap();

        assert_eq!(activo.fecha_compra, None);
        assert_eq!(activo.price, None);
        assert_eq!(activo.quantity_on_stock, None);
        assert_eq!(activo.items_group_code, None);
        assert_eq!(activo.fecha_baja, None);

        let record = activo.normalize(date("2025-04-01"));
        assert_eq!(record.purchase_date, date("2025-04-01"));
        assert_eq!(record.price, Decimal::ZERO);
        assert_eq!(record.quantity_on_stock, 0);
        assert_eq!(record.items_group_code, None);
    }

    #[test]
    fn test_mistyped_field_still_fails_the_item() {
        let result = serde_json::from_value::<NewActivo>(serde_json::json!({
            "ItemCode": "A3",
            "QuantityOnStock": "muchos"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_accepts_blank_typed_fields() {
        let update: ActivoUpdate = serde_json::from_value(serde_json::json!({
            "ItemName": "switch",
            "Price": "",
            "fecha_compra": "2024-01-15"
        }))
        .unwrap();

        assert_eq!(update.price, None);
        assert_eq!(update.fecha_compra, Some(date("2024-01-15")));
    }

    #[test]
    fn test_update_normalizes_descriptive_fields_only() {
        let update = ActivoUpdate {
            item_name: Some("router".to_string()),
            marca: None,
            modelo: Some(" ".to_string()),
            currency: None,
            ..Default::default()
        }
        .normalize();

        assert_eq!(update.item_name.as_deref(), Some("ROUTER"));
        assert_eq!(update.marca.as_deref(), Some(UNSPECIFIED_BRAND));
        assert_eq!(update.modelo.as_deref(), Some(UNSPECIFIED_MODEL));
        assert_eq!(update.currency, None);
        assert_eq!(update.fecha_compra, None);
    }

    #[test]
    fn test_estado_parsing() {
        assert_eq!(EstadoActivo::parse("Disponible"), Some(EstadoActivo::Disponible));
        assert_eq!(EstadoActivo::parse("Pérdida"), Some(EstadoActivo::Perdida));
        assert_eq!(EstadoActivo::parse("Perdida"), None);
        assert_eq!(EstadoActivo::parse("disponible"), None);
        assert_eq!(EstadoActivo::Perdida.as_str(), "Pérdida");
    }
}
