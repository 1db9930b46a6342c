use crate::models::{CombinedRecord, Filters, ALL_SPECIALTIES, ALL_VALUES};

fn is_active(value: &str, sentinel: &str) -> bool {
    !value.is_empty() && value != sentinel
}

fn matches_search(record: &CombinedRecord, needle: &str) -> bool {
    let fields = [
        Some(record.doctor_name.as_str()),
        Some(record.specialty.as_str()),
        Some(record.building_name.as_str()),
        Some(record.day_name.as_str()),
        record.room_description.as_deref(),
    ];
    fields
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(needle))
}

/// Keeps the input order; the reconciler already put the newest schedule
/// first and the table must not reshuffle on every keystroke.
pub fn filter_records(records: &[CombinedRecord], filters: &Filters) -> Vec<CombinedRecord> {
    let needle = filters.search_text.to_lowercase();

    records
        .iter()
        .filter(|r| !is_active(&filters.specialty, ALL_SPECIALTIES) || r.specialty == filters.specialty)
        .filter(|r| !is_active(&filters.building, ALL_VALUES) || r.building_name == filters.building)
        .filter(|r| !is_active(&filters.kind, ALL_VALUES) || r.kind.label() == filters.kind)
        .filter(|r| needle.is_empty() || matches_search(r, &needle))
        .cloned()
        .collect()
}

/// 1-based page window. Pages outside the range are empty.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}
