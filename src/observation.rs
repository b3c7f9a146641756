use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{
    CategoryStats, DateRange, ObservationRecord, ObservationStats, OptionCount, SelectionEntry,
    StatsEntry,
};

/// Width of the widest bar in the category chart.
pub const BAR_SCALE: f64 = 100.0;

/// Checked boxes of an observation form, keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSelection {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl ObservationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one option and returns whether it is now selected.
    pub fn toggle(&mut self, category: &str, option: &str) -> bool {
        let options = self.categories.entry(category.to_string()).or_default();
        let selected = if options.remove(option) {
            false
        } else {
            options.insert(option.to_string());
            true
        };
        if options.is_empty() {
            self.categories.remove(category);
        }
        selected
    }

    pub fn selected_count(&self) -> usize {
        self.categories.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn flatten(&self) -> Vec<SelectionEntry> {
        self.categories
            .iter()
            .flat_map(|(category, options)| {
                options.iter().map(move |option| SelectionEntry {
                    category: category.clone(),
                    option: option.clone(),
                    selected: true,
                })
            })
            .collect()
    }

    /// Rebuilds form state from persisted entries; unselected entries are
    /// ignored.
    pub fn from_entries(entries: &[SelectionEntry]) -> Self {
        let mut selection = Self::new();
        for entry in entries.iter().filter(|entry| entry.selected) {
            selection
                .categories
                .entry(entry.category.clone())
                .or_default()
                .insert(entry.option.clone());
        }
        selection
    }
}

/// Counts selections per `(category, option)` in first-seen order.
pub fn count_selections<'a>(entries: impl IntoIterator<Item = &'a SelectionEntry>) -> Vec<StatsEntry> {
    let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
    let mut stats: Vec<StatsEntry> = Vec::new();
    for entry in entries.into_iter().filter(|entry| entry.selected) {
        let key = (entry.category.as_str(), entry.option.as_str());
        match positions.get(&key) {
            Some(&position) => stats[position].count += 1,
            None => {
                positions.insert(key, stats.len());
                stats.push(StatsEntry {
                    category: entry.category.clone(),
                    option: entry.option.clone(),
                    count: 1,
                });
            }
        }
    }
    stats
}

/// Groups counts by category, keeping first-seen order, and sizes each
/// category's bar relative to the largest total.
pub fn group_by_category(stats: &[StatsEntry]) -> Vec<CategoryStats> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<CategoryStats> = Vec::new();
    for entry in stats {
        let position = *positions.entry(entry.category.as_str()).or_insert_with(|| {
            grouped.push(CategoryStats {
                category: entry.category.clone(),
                total: 0,
                options: Vec::new(),
                bar_width: 0.0,
            });
            grouped.len() - 1
        });
        let group = &mut grouped[position];
        group.total += entry.count;
        group.options.push(OptionCount {
            option: entry.option.clone(),
            count: entry.count,
        });
    }

    let max_total = grouped.iter().map(|group| group.total).max().unwrap_or(0);
    for group in &mut grouped {
        group.bar_width = bar_width(group.total, max_total);
    }
    grouped
}

pub fn bar_width(total: usize, max_total: usize) -> f64 {
    if max_total == 0 {
        return 0.0;
    }
    (total as f64 / max_total as f64 * BAR_SCALE).min(BAR_SCALE)
}

/// Statistics over the records observed inside `range`.
pub fn observation_stats(records: &[ObservationRecord], range: DateRange) -> ObservationStats {
    let mut in_range: Vec<&ObservationRecord> = records
        .iter()
        .filter(|record| range.contains(&record.observed_at))
        .collect();
    in_range.sort_by_key(|record| record.observed_at);

    let stats = count_selections(in_range.iter().flat_map(|record| &record.entries));
    tracing::debug!(
        records = in_range.len(),
        pairs = stats.len(),
        "computed observation stats"
    );
    ObservationStats {
        range,
        records: in_range.len(),
        categories: group_by_category(&stats),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn entry(category: &str, option: &str) -> SelectionEntry {
        SelectionEntry {
            category: category.to_string(),
            option: option.to_string(),
            selected: true,
        }
    }

    fn record(day: u32, entries: Vec<SelectionEntry>) -> ObservationRecord {
        ObservationRecord {
            id: Uuid::new_v4(),
            observed_at: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
            area: "Taller".to_string(),
            observer: None,
            entries,
        }
    }

    #[test]
    fn toggle_on_and_off() {
        let mut selection = ObservationSelection::new();
        assert!(selection.toggle("epp", "No se usan"));
        assert_eq!(selection.selected_count(), 1);
        assert!(!selection.toggle("epp", "No se usan"));
        assert_eq!(selection.selected_count(), 0);
        assert!(selection.is_empty());
    }

    #[test]
    fn flatten_emits_only_selected_options() {
        let mut selection = ObservationSelection::new();
        selection.toggle("normas", "No existen");
        selection.toggle("epp", "No se usan");
        selection.toggle("epp", "Dañados");
        selection.toggle("epp", "Dañados");
        assert_eq!(selection.selected_count(), 2);
        assert_eq!(
            selection.flatten(),
            vec![entry("epp", "No se usan"), entry("normas", "No existen")]
        );
    }

    #[test]
    fn from_entries_ignores_unselected() {
        let mut unselected = entry("epp", "Dañados");
        unselected.selected = false;
        let selection =
            ObservationSelection::from_entries(&[entry("epp", "No se usan"), unselected]);
        assert_eq!(selection.flatten(), vec![entry("epp", "No se usan")]);
    }

    #[test]
    fn aggregator_grouping() {
        let entries = vec![
            entry("epp", "No se usan"),
            entry("epp", "No se usan"),
            entry("normas", "No existen"),
        ];
        let stats = count_selections(&entries);
        assert_eq!(
            stats,
            vec![
                StatsEntry {
                    category: "epp".into(),
                    option: "No se usan".into(),
                    count: 2
                },
                StatsEntry {
                    category: "normas".into(),
                    option: "No existen".into(),
                    count: 1
                },
            ]
        );
        let grouped = group_by_category(&stats);
        let totals: Vec<(&str, usize)> = grouped
            .iter()
            .map(|group| (group.category.as_str(), group.total))
            .collect();
        assert_eq!(totals, vec![("epp", 2), ("normas", 1)]);
        assert_eq!(grouped[0].bar_width, 100.0);
        assert_eq!(grouped[1].bar_width, 50.0);
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let entries = vec![
            entry("orden", "Pasillos obstruidos"),
            entry("epp", "No se usan"),
            entry("epp", "No se usan"),
            entry("orden", "Derrames"),
        ];
        let grouped = group_by_category(&count_selections(&entries));
        assert_eq!(grouped[0].category, "orden");
        assert_eq!(grouped[0].options.len(), 2);
        assert_eq!(grouped[1].category, "epp");
        assert_eq!(grouped[0].total, grouped[1].total);
    }

    #[test]
    fn bar_width_is_capped_and_zero_safe() {
        assert_eq!(bar_width(0, 0), 0.0);
        assert_eq!(bar_width(5, 5), BAR_SCALE);
        assert_eq!(bar_width(9, 3), BAR_SCALE);
        assert_eq!(bar_width(1, 4), 25.0);
    }

    #[test]
    fn stats_respect_inclusive_date_range() {
        let records = vec![
            record(1, vec![entry("epp", "No se usan")]),
            record(5, vec![entry("epp", "No se usan"), entry("normas", "No existen")]),
            record(9, vec![entry("normas", "No existen")]),
        ];
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 5),
        };
        let stats = observation_stats(&records, range);
        assert_eq!(stats.records, 2);
        let totals: Vec<(&str, usize)> = stats
            .categories
            .iter()
            .map(|group| (group.category.as_str(), group.total))
            .collect();
        assert_eq!(totals, vec![("epp", 2), ("normas", 1)]);
    }

    #[test]
    fn empty_history_has_no_categories() {
        let stats = observation_stats(&[], DateRange::default());
        assert_eq!(stats.records, 0);
        assert!(stats.categories.is_empty());
    }
}
