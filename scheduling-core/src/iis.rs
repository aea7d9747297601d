//! Decodes a backend-reported irreducible infeasible subsystem (a set of row
//! indices) into the same diagnostic taxonomy the presolver and relaxation
//! prober speak.
//!
//! No backend wired up in this build actually supplies row indices (see
//! [`crate::solver::HighsBackend::infeasible_rows`]), so this module is
//! exercised directly by its own tests against synthetic row sets rather
//! than through a live solve. It stays fully implemented because a future
//! backend with real IIS support only needs to call [`decode`].

use std::collections::BTreeMap;

use crate::domain::{DiagnosticItem, DiagnosticTag, Severity};
use crate::model::ConstraintCategory;

fn tag_for_category(category: ConstraintCategory) -> Option<DiagnosticTag> {
    match category {
        ConstraintCategory::Staffing => Some(DiagnosticTag::C2Staffing),
        ConstraintCategory::Unavail => Some(DiagnosticTag::C3Unavailable),
        ConstraintCategory::Consec => Some(DiagnosticTag::C4Consecutive),
        ConstraintCategory::Weekly => Some(DiagnosticTag::C5WeeklyMax),
        ConstraintCategory::Interval => Some(DiagnosticTag::B4Interval),
        ConstraintCategory::Role => Some(DiagnosticTag::B5RoleStaffing),
        ConstraintCategory::MinDays => Some(DiagnosticTag::B6MinDays),
        ConstraintCategory::One
        | ConstraintCategory::FairMax
        | ConstraintCategory::FairMin
        | ConstraintCategory::WeekendFairMax
        | ConstraintCategory::WeekendFairMin => None,
    }
}

/// The fixed category-to-remedy mapping: what a user should try in response
/// to each constraint family showing up in an infeasible subsystem.
fn remedy_for_tag(tag: DiagnosticTag) -> &'static str {
    match tag {
        DiagnosticTag::C2Staffing => "reduce required counts or enable soft-staffing",
        DiagnosticTag::C3Unavailable => "too many unavailability entries",
        DiagnosticTag::C4Consecutive => "raise max consecutive days",
        DiagnosticTag::C5WeeklyMax => "raise weekly maximum",
        DiagnosticTag::B4Interval => "shorten or disable inter-shift interval",
        DiagnosticTag::B5RoleStaffing => "adjust role requirements",
        DiagnosticTag::B6MinDays => "lower weekly minimum",
        DiagnosticTag::Combined | DiagnosticTag::Timeout => "no single family isolates the cause",
    }
}

/// Turns the labels of a reported IIS into diagnostics: rows are bucketed by
/// their category tag first, and each non-empty bucket yields exactly one
/// `DiagnosticItem` carrying up to three representative labels. Rows whose
/// category carries no diagnostic tag of its own (e.g. `one_`, the fairness
/// brackets) are bucketed under `Combined` since they only ever cause
/// infeasibility in concert with something else.
pub fn decode(labels: &[String], infeasible_rows: &[usize]) -> Vec<DiagnosticItem> {
    let mut buckets: BTreeMap<&'static str, (DiagnosticTag, Vec<&str>)> = BTreeMap::new();

    for &row in infeasible_rows {
        let Some(label) = labels.get(row) else {
            continue;
        };
        let category = ConstraintCategory::from_label(label);
        let tag = category
            .and_then(tag_for_category)
            .unwrap_or(DiagnosticTag::Combined);
        buckets
            .entry(tag.as_str())
            .or_insert_with(|| (tag, Vec::new()))
            .1
            .push(label.as_str());
    }

    buckets
        .into_values()
        .map(|(tag, examples)| {
            let shown: Vec<&str> = examples.iter().take(3).copied().collect();
            DiagnosticItem::new(
                tag,
                Severity::Error,
                format!(
                    "{} ({} row(s) in the infeasible subsystem, e.g. {})",
                    remedy_for_tag(tag),
                    examples.len(),
                    shown.join(", ")
                ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_category_iis_yields_one_bucketed_item() {
        let labels = vec![
            "staffing_20260302_1".to_string(),
            "staffing_20260303_1".to_string(),
        ];
        let items = decode(&labels, &[0, 1]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].constraint_tag, "C2_staffing");
        assert!(items[0].message.contains("staffing_20260302_1"));
        assert!(items[0].message.contains("staffing_20260303_1"));
    }

    #[test]
    fn mixed_categories_yield_one_item_per_category() {
        let labels = vec![
            "staffing_20260302_1".to_string(),
            "unavail_7_20260302_1".to_string(),
        ];
        let items = decode(&labels, &[0, 1]);
        assert_eq!(items.len(), 2);
        assert!(items.iter().any(|d| d.constraint_tag == "C2_staffing"));
        assert!(items.iter().any(|d| d.constraint_tag == "C3_unavailable"));
    }

    #[test]
    fn more_than_three_examples_in_a_bucket_are_truncated_in_the_message() {
        let labels = (0..5)
            .map(|i| format!("staffing_2026030{i}_1"))
            .collect::<Vec<_>>();
        let items = decode(&labels, &[0, 1, 2, 3, 4]);
        assert_eq!(items.len(), 1);
        assert!(items[0].message.contains("5 row(s)"));
        assert_eq!(items[0].message.matches("staffing_").count(), 3);
    }

    #[test]
    fn untagged_category_falls_back_to_combined() {
        let labels = vec!["one_7_20260302".to_string()];
        let items = decode(&labels, &[0]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].constraint_tag, "combined");
    }

    #[test]
    fn out_of_range_rows_are_skipped() {
        let labels = vec!["staffing_20260302_1".to_string()];
        assert!(decode(&labels, &[5]).is_empty());
    }
}
