// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Pure derivations from the lead list to the filtered and paginated views.

use std::cmp::Ordering;

use crate::{Lead, LeadFilters, Pagination, SortKey, SortOrder};

/// Filters by search text and status, then sorts by the chosen key.
///
/// Equal sort keys fall back to ascending id order regardless of direction,
/// so the result never depends on input order.
pub fn apply_filters(leads: &[Lead], filters: &LeadFilters) -> Vec<Lead> {
    let needle = filters.search.to_lowercase();
    let mut filtered: Vec<Lead> = leads
        .iter()
        .filter(|lead| {
            needle.is_empty()
                || lead.name.to_lowercase().contains(&needle)
                || lead.company.to_lowercase().contains(&needle)
        })
        .filter(|lead| filters.status.matches(lead.status))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, filters.sort_by);
        let directed = match filters.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        directed.then_with(|| a.id.cmp(&b.id))
    });
    filtered
}

fn compare_by_key(a: &Lead, b: &Lead, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => a.score.cmp(&b.score),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
    }
}

/// Slices one page out of `filtered` and refreshes the derived totals.
///
/// Pages are 1-based. Page 0 and pages past the end yield an empty slice
/// rather than an error.
pub fn apply_pagination(filtered: &[Lead], pagination: Pagination) -> (Vec<Lead>, Pagination) {
    let total_items = filtered.len();
    let page_size = pagination.page_size.max(1);
    let total_pages = total_items.div_ceil(page_size);

    let displayed = match pagination.current_page.checked_sub(1) {
        Some(index) => {
            let start = index.saturating_mul(page_size).min(total_items);
            let end = start.saturating_add(page_size).min(total_items);
            filtered[start..end].to_vec()
        }
        None => Vec::new(),
    };
    (
        displayed,
        Pagination {
            total_items,
            total_pages,
            ..pagination
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{apply_filters, apply_pagination};
    use crate::{
        Lead, LeadFilters, LeadId, LeadStatus, Pagination, SortKey, SortOrder, StatusFilter,
    };

    fn lead(id: &str, name: &str, company: &str, score: u32, status: LeadStatus) -> Lead {
        Lead {
            id: LeadId::from(id),
            name: name.to_owned(),
            company: company.to_owned(),
            email: format!("{id}@example.com"),
            source: "web".to_owned(),
            score,
            status,
        }
    }

    fn ids(leads: &[Lead]) -> Vec<&str> {
        leads.iter().map(|lead| lead.id.as_str()).collect()
    }

    fn people() -> Vec<Lead> {
        vec![
            lead("1", "John Doe", "Acme", 80, LeadStatus::New),
            lead("2", "Jane Smith", "Globex", 70, LeadStatus::Contacted),
            lead("3", "Bob Johnson", "Initech", 60, LeadStatus::Qualified),
        ]
    }

    #[test]
    fn search_matches_name_substrings_case_insensitively() {
        let filters = LeadFilters {
            search: "John".to_owned(),
            ..LeadFilters::default()
        };
        let filtered = apply_filters(&people(), &filters);
        assert_eq!(ids(&filtered), vec!["1", "3"]);
    }

    #[test]
    fn search_matches_company() {
        let filters = LeadFilters {
            search: "GLOB".to_owned(),
            ..LeadFilters::default()
        };
        assert_eq!(ids(&apply_filters(&people(), &filters)), vec!["2"]);
    }

    #[test]
    fn status_filter_is_exact() {
        let filters = LeadFilters {
            status: StatusFilter::Only(LeadStatus::New),
            ..LeadFilters::default()
        };
        assert_eq!(apply_filters(&people(), &filters).len(), 1);
    }

    #[test]
    fn filtering_is_idempotent() {
        let filters = LeadFilters {
            search: "o".to_owned(),
            sort_by: SortKey::Name,
            sort_order: SortOrder::Asc,
            ..LeadFilters::default()
        };
        let once = apply_filters(&people(), &filters);
        let twice = apply_filters(&once, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn default_sort_is_score_descending() {
        let filtered = apply_filters(&people(), &LeadFilters::default());
        assert_eq!(ids(&filtered), vec!["1", "2", "3"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let leads = vec![
            lead("1", "bravo", "X", 1, LeadStatus::New),
            lead("2", "Alpha", "X", 1, LeadStatus::New),
            lead("3", "charlie", "X", 1, LeadStatus::New),
        ];
        let filters = LeadFilters {
            sort_by: SortKey::Name,
            sort_order: SortOrder::Asc,
            ..LeadFilters::default()
        };
        assert_eq!(ids(&apply_filters(&leads, &filters)), vec!["2", "1", "3"]);
    }

    #[test]
    fn ties_break_by_ascending_id_in_both_directions() {
        let forward = vec![
            lead("c", "A", "X", 50, LeadStatus::New),
            lead("a", "B", "X", 50, LeadStatus::New),
            lead("b", "C", "X", 50, LeadStatus::New),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let filters = LeadFilters {
                sort_order: order,
                ..LeadFilters::default()
            };
            assert_eq!(ids(&apply_filters(&forward, &filters)), vec!["a", "b", "c"]);
            assert_eq!(ids(&apply_filters(&reversed, &filters)), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn pagination_length_matches_formula() {
        let leads: Vec<Lead> = (0..23)
            .map(|index| lead(&format!("{index:03}"), "N", "C", 1, LeadStatus::New))
            .collect();
        for page in 1..=5 {
            let (displayed, pagination) = apply_pagination(
                &leads,
                Pagination {
                    current_page: page,
                    page_size: 10,
                    ..Pagination::default()
                },
            );
            let expected = 10.min(23_usize.saturating_sub((page - 1) * 10));
            assert_eq!(displayed.len(), expected, "page {page}");
            assert_eq!(pagination.total_pages, 3);
            assert_eq!(pagination.total_items, 23);
            assert_eq!(pagination.current_page, page);
        }
    }

    #[test]
    fn empty_input_has_zero_pages() {
        let (displayed, pagination) = apply_pagination(&[], Pagination::default());
        assert!(displayed.is_empty());
        assert_eq!(pagination.total_pages, 0);
        assert_eq!(pagination.total_items, 0);
    }

    #[test]
    fn page_zero_is_empty_but_keeps_totals() {
        let leads = people();
        let (displayed, pagination) = apply_pagination(
            &leads,
            Pagination {
                current_page: 0,
                ..Pagination::default()
            },
        );
        assert!(displayed.is_empty());
        assert_eq!(pagination.current_page, 0);
        assert_eq!(pagination.total_items, 3);
        assert_eq!(pagination.total_pages, 1);
    }
}
