// 📊 Reporting - Display text for members and items
//
// Pure formatting over the record store. Each report opens with a lone
// " " line and every entry is preceded by another " " separator line.

use chrono::NaiveDate;

use crate::entities::{Item, Member};
use crate::store::RecordStore;

pub const SEPARATOR: &str = " ";

/// Status of an item at report time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus<'a> {
    Available,
    Borrowed { by: &'a str, on: NaiveDate },
}

impl<'a> ItemStatus<'a> {
    pub fn of(store: &'a RecordStore, item: &Item) -> Self {
        store
            .holder_of(item.id)
            .and_then(|member| {
                member.loan_date(item.id).map(|on| ItemStatus::Borrowed {
                    by: member.name.as_str(),
                    on,
                })
            })
            .unwrap_or(ItemStatus::Available)
    }
}

pub fn member_entry(member: &Member) -> Vec<String> {
    let mut lines = vec![
        SEPARATOR.to_string(),
        format!("------ User Information for {} ------", member.id),
    ];
    lines.extend(member.info_lines());

    if member.penalty() > 0 {
        lines.push(format!("Penalty: {}$", member.penalty()));
    }

    lines
}

pub fn item_entry(item: &Item, status: &ItemStatus<'_>, date_format: &str) -> Vec<String> {
    let status_line = match status {
        ItemStatus::Available => format!("ID: {} Name: {} Status: Available", item.id, item.title),
        ItemStatus::Borrowed { by, on } => format!(
            "ID: {} Name: {} Status: Borrowed Borrowed Date: {} Borrowed by: {}",
            item.id,
            item.title,
            on.format(date_format),
            by
        ),
    };

    vec![
        SEPARATOR.to_string(),
        format!("------ Item Information for {} ------", item.id),
        status_line,
        item.info_line(),
    ]
}

/// All members, ascending by id
pub fn members_report(store: &RecordStore) -> Vec<String> {
    let mut lines = vec![SEPARATOR.to_string()];
    for member in store.members() {
        lines.extend(member_entry(member));
    }
    lines
}

/// All items with their loan status, ascending by id
pub fn items_report(store: &RecordStore, date_format: &str) -> Vec<String> {
    let mut lines = vec![SEPARATOR.to_string()];
    for item in store.items() {
        let status = ItemStatus::of(store, item);
        lines.extend(item_entry(item, &status, date_format));
    }
    lines
}

// ============================================================================
// TESTS
// ============================================================================
