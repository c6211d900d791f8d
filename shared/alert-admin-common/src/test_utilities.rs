//! Test fixtures for alert records

#[cfg(test)]
use crate::{AlertId, AlertRecord, Category, Criticality, Source};
#[cfg(test)]
use chrono::{NaiveDate, NaiveTime};

/// A complete, valid BEx alert shown on the control tower at position 3
#[cfg(test)]
pub fn create_test_record() -> AlertRecord {
    AlertRecord {
        id: None,
        title: "Stock below minimum".to_string(),
        source: Some(Source::BEx),
        technical_name: "ZQ_STOCK_01".to_string(),
        uom: "EA".to_string(),
        category: Some(Category::Inventory),
        page_no: "1".to_string(),
        criticality: Some(Criticality::Critical),
        detail: "ZQ_STOCK_01_DETAIL".to_string(),
        show_on_ct: true,
        order_on_ct: "3".to_string(),
        ..AlertRecord::default()
    }
}

/// A stored alert as returned by the service
#[cfg(test)]
pub fn create_stored_record(
    id: &str,
    title: &str,
    category: Category,
    criticality: Criticality,
) -> AlertRecord {
    AlertRecord {
        id: Some(AlertId::new(id)),
        title: title.to_string(),
        category: Some(category),
        criticality: Some(criticality),
        changed_on: NaiveDate::from_ymd_opt(2024, 1, 15),
        changed_at: NaiveTime::from_hms_opt(9, 0, 0),
        ..create_test_record()
    }
}
