//! Core types for alert administration
//!
//! The alert record mirrors the entity exposed by the alert service. Enumerated
//! fields travel as short wire keys (`B`, `IN`, `C`, ...) and are optional on a
//! candidate record until the user picks a value.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned alert identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub String);

impl AlertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enumerations that travel as short string keys on the wire
pub trait WireKey: Sized + Copy {
    fn key(&self) -> &'static str;
    fn from_key(key: &str) -> Option<Self>;
}

/// Serde adapter for optional wire-key fields. Empty or unknown keys read as `None`.
pub(crate) mod wire_key {
    use super::WireKey;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: WireKey,
    {
        serializer.serialize_str(value.map(|v| v.key()).unwrap_or(""))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: WireKey,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().map(str::trim).and_then(T::from_key))
    }
}

/// Where the alert's data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "B")]
    BEx,
    #[serde(rename = "H")]
    Hana,
}

impl WireKey for Source {
    fn key(&self) -> &'static str {
        match self {
            Source::BEx => "B",
            Source::Hana => "H",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "B" => Some(Source::BEx),
            "H" => Some(Source::Hana),
            _ => None,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::BEx => write!(f, "BW BEx Query"),
            Source::Hana => write!(f, "HANA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "IN")]
    Inventory,
    #[serde(rename = "LG")]
    Logistics,
    #[serde(rename = "PR")]
    Process,
}

impl WireKey for Category {
    fn key(&self) -> &'static str {
        match self {
            Category::Inventory => "IN",
            Category::Logistics => "LG",
            Category::Process => "PR",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "IN" => Some(Category::Inventory),
            "LG" => Some(Category::Logistics),
            "PR" => Some(Category::Process),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Inventory => write!(f, "Inventory"),
            Category::Logistics => write!(f, "Logistics"),
            Category::Process => write!(f, "Process"),
        }
    }
}

/// Alert level of criticality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criticality {
    #[serde(rename = "C")]
    Critical,
    #[serde(rename = "W")]
    Warning,
    #[serde(rename = "N")]
    Normal,
}

impl WireKey for Criticality {
    fn key(&self) -> &'static str {
        match self {
            Criticality::Critical => "C",
            Criticality::Warning => "W",
            Criticality::Normal => "N",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "C" => Some(Criticality::Critical),
            "W" => Some(Criticality::Warning),
            "N" => Some(Criticality::Normal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Criticality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criticality::Critical => write!(f, "Critical"),
            Criticality::Warning => write!(f, "Warning"),
            Criticality::Normal => write!(f, "Normal"),
        }
    }
}

/// One alert configuration as edited in the create dialog or detail form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AlertId>,
    #[serde(default)]
    pub title: String,
    #[serde(default, with = "wire_key")]
    pub source: Option<Source>,
    #[serde(default)]
    pub technical_name: String,
    #[serde(default)]
    pub uom: String,
    #[serde(default, with = "wire_key")]
    pub category: Option<Category>,
    #[serde(default = "default_page_no")]
    pub page_no: String,
    #[serde(default, with = "wire_key")]
    pub criticality: Option<Criticality>,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub email_detail: String,
    #[serde(default, rename = "showOnCT")]
    pub show_on_ct: bool,
    #[serde(default = "default_order", rename = "orderOnCT")]
    pub order_on_ct: String,
    #[serde(default = "default_trend")]
    pub trend: bool,
    #[serde(default)]
    pub auto_email: bool,
    #[serde(default)]
    pub email_to: String,
    #[serde(default)]
    pub email_org: String,
    #[serde(default, rename = "emailCC")]
    pub email_cc: String,
    #[serde(default)]
    pub email_body: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub changed_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<NaiveTime>,
}

fn default_page_no() -> String {
    "1".to_string()
}

fn default_order() -> String {
    "0".to_string()
}

fn default_trend() -> bool {
    true
}

impl Default for AlertRecord {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            source: None,
            technical_name: String::new(),
            uom: String::new(),
            category: None,
            page_no: default_page_no(),
            criticality: None,
            detail: String::new(),
            email_detail: String::new(),
            show_on_ct: false,
            order_on_ct: default_order(),
            trend: default_trend(),
            auto_email: false,
            email_to: String::new(),
            email_org: String::new(),
            email_cc: String::new(),
            email_body: String::new(),
            frequency: String::new(),
            changed_by: String::new(),
            changed_on: None,
            changed_at: None,
        }
    }
}

impl AlertRecord {
    /// Fresh candidate for the create flow, stamped with the creation time
    pub fn new_candidate(defaults: &AlertDefaults, now: DateTime<Utc>) -> Self {
        Self {
            source: defaults.source,
            category: defaults.category,
            criticality: defaults.criticality,
            changed_on: Some(now.date_naive()),
            changed_at: Some(now.time()),
            ..Self::default()
        }
    }

    /// Candidate for the edit flow, cloned from a record fetched from the service
    pub fn for_edit(fetched: &AlertRecord) -> Self {
        let mut record = fetched.clone();
        if record.email_detail.is_empty() {
            record.email_detail = record.detail.clone();
        }
        record
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Arguments for the order conflict query
    pub fn order_query(&self) -> OrderQuery {
        OrderQuery {
            alert_id: self.id.clone(),
            category: self.category,
            page_no: self.page_no.clone(),
            order: self.order_on_ct.clone(),
        }
    }
}

/// First entries of the source, category and level value lists, used to
/// preselect values on a new candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertDefaults {
    pub source: Option<Source>,
    pub category: Option<Category>,
    pub criticality: Option<Criticality>,
}

/// Arguments of the order conflict check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<AlertId>,
    #[serde(default, with = "wire_key")]
    pub category: Option<Category>,
    pub page_no: String,
    pub order: String,
}

/// Answer of the order conflict check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCheckResult {
    pub exceeds_max: bool,
    pub is_reserved: bool,
    #[serde(default)]
    pub current_holder_id: Option<String>,
}

impl OrderCheckResult {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn reserved_by(holder: impl Into<String>) -> Self {
        Self {
            exceeds_max: false,
            is_reserved: true,
            current_holder_id: Some(holder.into()),
        }
    }

    pub fn exceeding_max() -> Self {
        Self {
            exceeds_max: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_record_reads_wire_keys() {
        let record: AlertRecord = serde_json::from_value(json!({
            "id": "A-1",
            "title": "Stock below minimum",
            "source": "B",
            "technicalName": "ZQ_STOCK_01",
            "category": "PR",
            "pageNo": "2",
            "criticality": "W",
            "showOnCT": true,
            "orderOnCT": "4",
            "emailCC": "ops@example.com"
        }))
        .unwrap();

        assert_eq!(record.id, Some(AlertId::new("A-1")));
        assert_eq!(record.source, Some(Source::BEx));
        assert_eq!(record.category, Some(Category::Process));
        assert_eq!(record.criticality, Some(Criticality::Warning));
        assert!(record.show_on_ct);
        assert_eq!(record.order_on_ct, "4");
        assert_eq!(record.email_cc, "ops@example.com");
        assert!(record.trend);
    }

    #[test]
    fn test_unknown_and_empty_keys_read_as_missing() {
        let record: AlertRecord = serde_json::from_value(json!({
            "source": "",
            "category": "XX",
            "criticality": null
        }))
        .unwrap();

        assert_eq!(record.source, None);
        assert_eq!(record.category, None);
        assert_eq!(record.criticality, None);
        assert_eq!(record.page_no, "1");
        assert_eq!(record.order_on_ct, "0");
    }

    #[test]
    fn test_record_writes_wire_keys() {
        let record = AlertRecord {
            source: Some(Source::Hana),
            category: Some(Category::Logistics),
            ..AlertRecord::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["source"], "H");
        assert_eq!(value["category"], "LG");
        assert_eq!(value["criticality"], "");
        assert_eq!(value["showOnCT"], false);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_new_candidate_uses_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 10).unwrap();
        let defaults = AlertDefaults {
            source: Some(Source::BEx),
            category: Some(Category::Inventory),
            criticality: Some(Criticality::Critical),
        };

        let record = AlertRecord::new_candidate(&defaults, now);
        assert!(record.is_new());
        assert_eq!(record.source, Some(Source::BEx));
        assert_eq!(record.page_no, "1");
        assert_eq!(record.order_on_ct, "0");
        assert_eq!(record.changed_on, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(record.changed_at, NaiveTime::from_hms_opt(14, 30, 10));
    }

    #[test]
    fn test_for_edit_seeds_email_detail() {
        let fetched = AlertRecord {
            id: Some(AlertId::new("A-7")),
            detail: "ZQ_DETAIL".to_string(),
            ..AlertRecord::default()
        };

        let record = AlertRecord::for_edit(&fetched);
        assert_eq!(record.email_detail, "ZQ_DETAIL");

        let fetched = AlertRecord {
            email_detail: "ZQ_MAIL".to_string(),
            ..fetched
        };
        assert_eq!(AlertRecord::for_edit(&fetched).email_detail, "ZQ_MAIL");
    }
}
