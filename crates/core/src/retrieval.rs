//! Retrieval plan for paginated track listing.
//!
//! A [`RetrievalPlan`] is the store-agnostic description of one listing
//! query: which mode runs, which range clauses apply, how rows are ordered,
//! and which slice is returned. The repository layer renders it to SQL.

use serde::Serialize;

use crate::filters::{NormalizedTrackQuery, PageWindow, RangeFilter};
use crate::search::SearchTerm;

/// Filterable numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeColumn {
    Energy,
    Danceability,
    Popularity,
}

impl RangeColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            RangeColumn::Energy => "energy",
            RangeColumn::Danceability => "danceability",
            RangeColumn::Popularity => "popularity",
        }
    }
}

/// A numeric bound value, typed to match its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundValue {
    Float(f64),
    Int(i32),
}

/// One active range constraint. Only the side(s) that differ from the
/// domain edge are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeClause {
    pub column: RangeColumn,
    pub min: Option<BoundValue>,
    pub max: Option<BoundValue>,
}

impl RangeClause {
    fn from_float(column: RangeColumn, filter: &RangeFilter<f64>) -> Self {
        Self {
            column,
            min: filter.constrains_min().then_some(BoundValue::Float(filter.min)),
            max: filter.constrains_max().then_some(BoundValue::Float(filter.max)),
        }
    }

    fn from_int(column: RangeColumn, filter: &RangeFilter<i32>) -> Self {
        Self {
            column,
            min: filter.constrains_min().then_some(BoundValue::Int(filter.min)),
            max: filter.constrains_max().then_some(BoundValue::Int(filter.max)),
        }
    }
}

/// Which retrieval path runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Relevance-ranked fuzzy/prefix match on name and artist.
    Text(SearchTerm),
    /// Range filters only, index-ordered.
    Browse,
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Text-search rank, best first.
    Relevance,
    /// `popularity` descending.
    PopularityDesc,
}

/// A fully resolved listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalPlan {
    pub mode: RetrievalMode,
    pub ranges: Vec<RangeClause>,
    pub order: SortOrder,
    pub window: PageWindow,
}

impl RetrievalPlan {
    /// Build the plan for a normalized query. Inactive dimensions produce no
    /// clause at all.
    pub fn from_query(query: &NormalizedTrackQuery) -> Self {
        let mut ranges = Vec::with_capacity(3);
        if query.active.energy {
            ranges.push(RangeClause::from_float(RangeColumn::Energy, &query.filters.energy));
        }
        if query.active.danceability {
            ranges.push(RangeClause::from_float(
                RangeColumn::Danceability,
                &query.filters.danceability,
            ));
        }
        if query.active.popularity {
            ranges.push(RangeClause::from_int(
                RangeColumn::Popularity,
                &query.filters.popularity,
            ));
        }

        let (mode, order) = match &query.search {
            Some(term) => (RetrievalMode::Text(term.clone()), SortOrder::Relevance),
            None => (RetrievalMode::Browse, SortOrder::PopularityDesc),
        };

        Self {
            mode,
            ranges,
            order,
            window: query.page,
        }
    }
}

/// Pagination metadata attached to every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl Pagination {
    /// `pages = ceil(total / limit)`; zero rows means zero pages.
    pub fn new(total: i64, window: PageWindow) -> Self {
        Self {
            total,
            page: window.page,
            pages: page_count(total, window.limit),
        }
    }
}

/// Number of pages needed to show `total` rows at `limit` per page.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// One page of records plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TrackPage<T> {
    pub records: Vec<T>,
    pub pagination: Pagination,
}

impl<T> TrackPage<T> {
    pub fn new(records: Vec<T>, total: i64, window: PageWindow) -> Self {
        Self {
            records,
            pagination: Pagination::new(total, window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{TrackListParams, BULK_LISTING_CAP};

    fn normalize(p: TrackListParams) -> NormalizedTrackQuery {
        NormalizedTrackQuery::from_params(&p, BULK_LISTING_CAP)
    }

    #[test]
    fn full_range_browse_has_empty_predicate_and_popularity_sort() {
        let q = normalize(TrackListParams {
            energy_min: Some("0".into()),
            energy_max: Some("1".into()),
            danceability_min: Some("0".into()),
            danceability_max: Some("1".into()),
            popularity_min: Some("0".into()),
            popularity_max: Some("100".into()),
            ..Default::default()
        });
        let plan = RetrievalPlan::from_query(&q);
        assert!(plan.ranges.is_empty());
        assert_eq!(plan.mode, RetrievalMode::Browse);
        assert_eq!(plan.order, SortOrder::PopularityDesc);
    }

    #[test]
    fn search_selects_text_mode_with_relevance() {
        let q = normalize(TrackListParams {
            search: Some("love".into()),
            energy_min: Some("0.2".into()),
            energy_max: Some("1".into()),
            ..Default::default()
        });
        let plan = RetrievalPlan::from_query(&q);
        assert_eq!(
            plan.mode,
            RetrievalMode::Text(SearchTerm::parse("love").unwrap())
        );
        assert_eq!(plan.order, SortOrder::Relevance);
        assert_eq!(
            plan.ranges,
            vec![RangeClause {
                column: RangeColumn::Energy,
                min: Some(BoundValue::Float(0.2)),
                max: None,
            }]
        );
    }

    #[test]
    fn only_constraining_sides_are_emitted() {
        let q = normalize(TrackListParams {
            popularity_min: Some("70".into()),
            popularity_max: Some("90".into()),
            danceability_max: Some("0.5".into()),
            ..Default::default()
        });
        let plan = RetrievalPlan::from_query(&q);
        assert_eq!(
            plan.ranges,
            vec![
                RangeClause {
                    column: RangeColumn::Danceability,
                    min: None,
                    max: Some(BoundValue::Float(0.5)),
                },
                RangeClause {
                    column: RangeColumn::Popularity,
                    min: Some(BoundValue::Int(70)),
                    max: Some(BoundValue::Int(90)),
                },
            ]
        );
    }

    #[test]
    fn page_count_is_ceiling() {
        assert_eq!(page_count(0, 50), 0);
        assert_eq!(page_count(1, 50), 1);
        assert_eq!(page_count(50, 50), 1);
        assert_eq!(page_count(51, 50), 2);
        assert_eq!(page_count(2001, 2000), 2);
        for total in 0..200 {
            for limit in 1..20 {
                let expected = (total as f64 / limit as f64).ceil() as i64;
                assert_eq!(page_count(total, limit), expected);
            }
        }
    }

    #[test]
    fn empty_page_has_zero_pages() {
        let page: TrackPage<i32> = TrackPage::new(vec![], 0, PageWindow::first(50));
        assert!(page.records.is_empty());
        assert_eq!(page.pagination, Pagination { total: 0, page: 1, pages: 0 });
    }
}
