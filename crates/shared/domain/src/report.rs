//! Administrator report: activity counts by district, agent and status.

use serde::Serialize;

/// One category and its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub category: String,
    pub value: u64,
}

impl ReportRow {
    pub fn new(category: impl Into<String>, value: u64) -> Self {
        Self {
            category: category.into(),
            value,
        }
    }
}

/// Rows are ordered by count, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RegistryReport {
    /// Active listings per district
    pub districts: Vec<ReportRow>,
    /// Active interactions per assigned agent
    pub agents: Vec<ReportRow>,
    /// Active interactions per status
    pub statuses: Vec<ReportRow>,
}

/// Sum of every row's value.
pub fn total(rows: &[ReportRow]) -> u64 {
    rows.iter().map(|row| row.value).sum()
}

/// Largest count first; equal counts by category name.
pub fn rank(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.category.cmp(&b.category)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_and_total() {
        let mut rows = vec![
            ReportRow::new("Northern", 2),
            ReportRow::new("Central", 5),
            ReportRow::new("Eastern", 2),
        ];
        rank(&mut rows);

        let order: Vec<_> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(order, vec!["Central", "Eastern", "Northern"]);
        assert_eq!(total(&rows), 9);
    }
}
