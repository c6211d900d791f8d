//! Master list query: search, filter, sort and group alerts
//!
//! Filters on the same property are OR-ed, filters on different properties are
//! AND-ed, and the title search is AND-ed with the filters.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::messages::{Message, MessageKey};
use crate::types::{AlertRecord, Category, Criticality, Source, WireKey};

/// Filter entries offered in the view settings dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListFilter {
    SourceBEx,
    #[serde(rename = "SourceHANA")]
    SourceHana,
    CatInv,
    CatLog,
    CatProc,
    LevelC,
    LevelW,
    LevelN,
    ShownY,
    ShownN,
    EmailAuto,
    EmailManual,
}

/// Property a filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterProperty {
    Source,
    Category,
    Criticality,
    ShowOnCt,
    AutoEmail,
}

impl ListFilter {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "SourceBEx" => Some(ListFilter::SourceBEx),
            "SourceHANA" => Some(ListFilter::SourceHana),
            "CatInv" => Some(ListFilter::CatInv),
            "CatLog" => Some(ListFilter::CatLog),
            "CatProc" => Some(ListFilter::CatProc),
            "LevelC" => Some(ListFilter::LevelC),
            "LevelW" => Some(ListFilter::LevelW),
            "LevelN" => Some(ListFilter::LevelN),
            "ShownY" => Some(ListFilter::ShownY),
            "ShownN" => Some(ListFilter::ShownN),
            "EmailAuto" => Some(ListFilter::EmailAuto),
            "EmailManual" => Some(ListFilter::EmailManual),
            _ => None,
        }
    }

    pub fn property(&self) -> FilterProperty {
        match self {
            ListFilter::SourceBEx | ListFilter::SourceHana => FilterProperty::Source,
            ListFilter::CatInv | ListFilter::CatLog | ListFilter::CatProc => {
                FilterProperty::Category
            }
            ListFilter::LevelC | ListFilter::LevelW | ListFilter::LevelN => {
                FilterProperty::Criticality
            }
            ListFilter::ShownY | ListFilter::ShownN => FilterProperty::ShowOnCt,
            ListFilter::EmailAuto | ListFilter::EmailManual => FilterProperty::AutoEmail,
        }
    }

    pub fn matches(&self, record: &AlertRecord) -> bool {
        match self {
            ListFilter::SourceBEx => record.source == Some(Source::BEx),
            ListFilter::SourceHana => record.source == Some(Source::Hana),
            ListFilter::CatInv => record.category == Some(Category::Inventory),
            ListFilter::CatLog => record.category == Some(Category::Logistics),
            ListFilter::CatProc => record.category == Some(Category::Process),
            ListFilter::LevelC => record.criticality == Some(Criticality::Critical),
            ListFilter::LevelW => record.criticality == Some(Criticality::Warning),
            ListFilter::LevelN => record.criticality == Some(Criticality::Normal),
            ListFilter::ShownY => record.show_on_ct,
            ListFilter::ShownN => !record.show_on_ct,
            ListFilter::EmailAuto => record.auto_email,
            ListFilter::EmailManual => !record.auto_email,
        }
    }

    /// Text shown in the filter bar
    pub fn caption(&self) -> &'static str {
        match self {
            ListFilter::SourceBEx => "BEx",
            ListFilter::SourceHana => "HANA",
            ListFilter::CatInv => "Inventory",
            ListFilter::CatLog => "Logistics",
            ListFilter::CatProc => "Process",
            ListFilter::LevelC => "Critical",
            ListFilter::LevelW => "Warning",
            ListFilter::LevelN => "Normal",
            ListFilter::ShownY => "Shown on CT",
            ListFilter::ShownN => "Not shown on CT",
            ListFilter::EmailAuto => "Automatic e-mail",
            ListFilter::EmailManual => "Manual e-mail",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Title,
    /// Change date, ties broken by change time
    ChangedOn,
    Criticality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    Category,
    Criticality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub key: GroupKey,
    pub descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub filters: Vec<ListFilter>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub descending: bool,
    #[serde(default)]
    pub group: Option<Grouping>,
}

/// One group of the rendered list. Ungrouped lists come back as a single group without header.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertGroup<'a> {
    pub header: Option<Message>,
    pub items: Vec<&'a AlertRecord>,
}

/// Texts and flags of the master list around the items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterViewState {
    pub title: Message,
    pub no_data_text: MessageKey,
    pub filter_bar_visible: bool,
    pub filter_bar_label: Message,
}

impl ListQuery {
    /// Set the search term. An empty term clears the search.
    pub fn search(&mut self, term: &str) {
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
    }

    /// Replace the active filters with the given filter keys; unknown keys are skipped
    pub fn set_filter_keys<'k>(&mut self, keys: impl IntoIterator<Item = &'k str>) {
        self.filters = keys.into_iter().filter_map(ListFilter::from_key).collect();
    }

    pub fn matches(&self, record: &AlertRecord) -> bool {
        if let Some(term) = &self.search {
            if !record.title.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }

        let mut properties: Vec<FilterProperty> =
            self.filters.iter().map(ListFilter::property).collect();
        properties.sort();
        properties.dedup();

        properties.into_iter().all(|property| {
            self.filters
                .iter()
                .filter(|filter| filter.property() == property)
                .any(|filter| filter.matches(record))
        })
    }

    /// Filter, sort and group the records
    pub fn apply<'a>(&self, records: &'a [AlertRecord]) -> Vec<AlertGroup<'a>> {
        let mut items: Vec<&AlertRecord> = records.iter().filter(|r| self.matches(r)).collect();

        items.sort_by(|a, b| {
            let group_order = match self.group {
                Some(grouping) => {
                    let order = group_value(grouping.key, a).cmp(group_value(grouping.key, b));
                    if grouping.descending {
                        order.reverse()
                    } else {
                        order
                    }
                }
                None => Ordering::Equal,
            };

            group_order.then_with(|| {
                let order = compare_by(self.sort, a, b);
                if self.descending {
                    order.reverse()
                } else {
                    order
                }
            })
        });

        let grouping = match self.group {
            Some(grouping) => grouping,
            None => {
                return vec![AlertGroup {
                    header: None,
                    items,
                }]
            }
        };

        let mut groups: Vec<AlertGroup<'a>> = Vec::new();
        let mut current: Option<&str> = None;
        for item in items {
            let value = group_value(grouping.key, item);
            if current == Some(value) {
                if let Some(group) = groups.last_mut() {
                    group.items.push(item);
                    continue;
                }
            }
            current = Some(value);
            groups.push(AlertGroup {
                header: group_header(grouping.key, item).map(Message::new),
                items: vec![item],
            });
        }
        groups
    }

    /// Title, no-data text and filter bar of the list showing `total` items
    pub fn view_state(&self, total: usize) -> MasterViewState {
        let captions: Vec<&str> = self.filters.iter().map(ListFilter::caption).collect();
        let narrowed = !self.filters.is_empty() || self.search.is_some();

        MasterViewState {
            title: Message::with_args(MessageKey::MasterTitleCount, [total.to_string()]),
            no_data_text: if narrowed {
                MessageKey::MasterListNoDataWithFilterOrSearchText
            } else {
                MessageKey::MasterListNoDataText
            },
            filter_bar_visible: !self.filters.is_empty(),
            filter_bar_label: Message::with_args(
                MessageKey::MasterFilterBarText,
                [captions.join(", ")],
            ),
        }
    }
}

fn compare_by(sort: SortKey, a: &AlertRecord, b: &AlertRecord) -> Ordering {
    match sort {
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::ChangedOn => a
            .changed_on
            .cmp(&b.changed_on)
            .then_with(|| a.changed_at.cmp(&b.changed_at)),
        SortKey::Criticality => group_value(GroupKey::Criticality, a)
            .cmp(group_value(GroupKey::Criticality, b)),
    }
}

/// The sorted and grouped value is the wire key, as the service sorts by it
fn group_value(key: GroupKey, record: &AlertRecord) -> &'static str {
    match key {
        GroupKey::Category => record.category.map(|c| c.key()).unwrap_or(""),
        GroupKey::Criticality => record.criticality.map(|c| c.key()).unwrap_or(""),
    }
}

fn group_header(key: GroupKey, record: &AlertRecord) -> Option<MessageKey> {
    match key {
        GroupKey::Category => record.category.map(|category| match category {
            Category::Inventory => MessageKey::MasterGroupCatHeaderInv,
            Category::Logistics => MessageKey::MasterGroupCatHeaderLog,
            Category::Process => MessageKey::MasterGroupCatHeaderProc,
        }),
        GroupKey::Criticality => record.criticality.map(|criticality| match criticality {
            Criticality::Critical => MessageKey::MasterGroupLevelHeaderC,
            Criticality::Warning => MessageKey::MasterGroupLevelHeaderW,
            Criticality::Normal => MessageKey::MasterGroupLevelHeaderN,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    fn sample_alerts() -> Vec<AlertRecord> {
        vec![
            create_stored_record("A-1", "Stock below minimum", Category::Inventory, Criticality::Critical),
            AlertRecord {
                show_on_ct: false,
                ..create_stored_record("A-2", "Late shipments", Category::Logistics, Criticality::Warning)
            },
            AlertRecord {
                source: Some(Source::Hana),
                auto_email: true,
                ..create_stored_record("A-3", "Open purchase orders", Category::Process, Criticality::Normal)
            },
            AlertRecord {
                source: Some(Source::Hana),
                ..create_stored_record("A-4", "Blocked stock", Category::Inventory, Criticality::Warning)
            },
        ]
    }

    fn titles(groups: &[AlertGroup<'_>]) -> Vec<String> {
        groups
            .iter()
            .flat_map(|g| g.items.iter().map(|r| r.title.clone()))
            .collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let alerts = sample_alerts();
        let mut query = ListQuery::default();
        query.search("STOCK");

        assert_eq!(
            titles(&query.apply(&alerts)),
            vec!["Blocked stock", "Stock below minimum"]
        );

        query.search("  ");
        assert_eq!(query.search, None);
        assert_eq!(query.apply(&alerts)[0].items.len(), 4);
    }

    #[test]
    fn test_filters_or_within_property_and_across() {
        let alerts = sample_alerts();
        let mut query = ListQuery::default();

        query.set_filter_keys(["CatInv", "CatLog"]);
        assert_eq!(query.apply(&alerts)[0].items.len(), 3);

        query.set_filter_keys(["CatInv", "CatLog", "LevelW"]);
        assert_eq!(
            titles(&query.apply(&alerts)),
            vec!["Blocked stock", "Late shipments"]
        );

        query.set_filter_keys(["SourceHANA", "EmailAuto", "Unknown"]);
        assert_eq!(query.filters.len(), 2);
        assert_eq!(titles(&query.apply(&alerts)), vec!["Open purchase orders"]);
    }

    #[test]
    fn test_search_and_filters_combine() {
        let alerts = sample_alerts();
        let mut query = ListQuery::default();
        query.search("stock");
        query.set_filter_keys(["SourceBEx"]);

        assert_eq!(titles(&query.apply(&alerts)), vec!["Stock below minimum"]);
    }

    #[test]
    fn test_sort_by_change_date_and_time() {
        let mut alerts = sample_alerts();
        alerts[0].changed_on = NaiveDate::from_ymd_opt(2024, 2, 1);
        alerts[1].changed_at = NaiveTime::from_hms_opt(8, 0, 0);
        alerts[2].changed_at = NaiveTime::from_hms_opt(17, 30, 0);

        let query = ListQuery {
            sort: SortKey::ChangedOn,
            descending: true,
            ..ListQuery::default()
        };

        assert_eq!(
            titles(&query.apply(&alerts)),
            vec![
                "Stock below minimum",
                "Open purchase orders",
                "Blocked stock",
                "Late shipments"
            ]
        );
    }

    #[test]
    fn test_grouping_by_category() {
        let alerts = sample_alerts();
        let query = ListQuery {
            group: Some(Grouping {
                key: GroupKey::Category,
                descending: false,
            }),
            ..ListQuery::default()
        };

        let groups = query.apply(&alerts);
        let headers: Vec<MessageKey> = groups
            .iter()
            .filter_map(|g| g.header.as_ref().map(|m| m.key))
            .collect();

        assert_eq!(
            headers,
            vec![
                MessageKey::MasterGroupCatHeaderInv,
                MessageKey::MasterGroupCatHeaderLog,
                MessageKey::MasterGroupCatHeaderProc
            ]
        );
        assert_eq!(
            titles(&groups[..1]),
            vec!["Blocked stock", "Stock below minimum"]
        );
    }

    #[test]
    fn test_grouping_by_criticality_descending() {
        let alerts = sample_alerts();
        let query = ListQuery {
            group: Some(Grouping {
                key: GroupKey::Criticality,
                descending: true,
            }),
            ..ListQuery::default()
        };

        let groups = query.apply(&alerts);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[0].header,
            Some(Message::new(MessageKey::MasterGroupLevelHeaderW))
        );
        assert_eq!(groups[0].items.len(), 2);
    }

    #[test]
    fn test_view_state() {
        let mut query = ListQuery::default();
        let state = query.view_state(4);
        assert_eq!(state.title.text(), "Alerts (4)");
        assert_eq!(state.no_data_text, MessageKey::MasterListNoDataText);
        assert!(!state.filter_bar_visible);

        query.set_filter_keys(["CatInv", "LevelC"]);
        let state = query.view_state(1);
        assert!(state.filter_bar_visible);
        assert_eq!(state.filter_bar_label.text(), "Filtered by Inventory, Critical");
        assert_eq!(
            state.no_data_text,
            MessageKey::MasterListNoDataWithFilterOrSearchText
        );

        query.filters.clear();
        query.search("late");
        let state = query.view_state(1);
        assert!(!state.filter_bar_visible);
        assert_eq!(
            state.no_data_text,
            MessageKey::MasterListNoDataWithFilterOrSearchText
        );
    }
}
