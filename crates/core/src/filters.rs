//! Filter normalization for track listing.
//!
//! Raw query parameters arrive as optional strings. Normalization resolves
//! every bound to a concrete value (falling back to the domain default when a
//! value is missing or unparseable), decides once which dimensions are
//! actually constraining, and resolves pagination. Malformed input never
//! produces an error.

use serde::Deserialize;

use crate::search::SearchTerm;
use crate::track::{POPULARITY_MAX, POPULARITY_MIN, UNIT_MAX, UNIT_MIN};

/// Default page size when `limit` is absent or invalid.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Hard ceiling on rows returned by any listing, including `/tracks/all`.
pub const BULK_LISTING_CAP: i64 = 2000;

/// Raw `GET /tracks` query parameters, exactly as sent by the caller.
///
/// Every value is kept as a string so that a malformed number degrades to
/// "no filter" instead of rejecting the request at extraction time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackListParams {
    pub search: Option<String>,
    pub energy_min: Option<String>,
    pub energy_max: Option<String>,
    pub danceability_min: Option<String>,
    pub danceability_max: Option<String>,
    pub popularity_min: Option<String>,
    pub popularity_max: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A resolved `[min, max]` bound over a fixed domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter<T> {
    pub min: T,
    pub max: T,
    pub domain_min: T,
    pub domain_max: T,
}

impl<T: PartialOrd + Copy> RangeFilter<T> {
    /// A filter spanning its whole domain.
    pub fn full(domain_min: T, domain_max: T) -> Self {
        Self {
            min: domain_min,
            max: domain_max,
            domain_min,
            domain_max,
        }
    }

    /// Build from optional parsed bounds, clamping into the domain.
    pub fn resolve(min: Option<T>, max: Option<T>, domain_min: T, domain_max: T) -> Self {
        let clamp = |v: T| {
            if v < domain_min {
                domain_min
            } else if v > domain_max {
                domain_max
            } else {
                v
            }
        };
        Self {
            min: min.map(clamp).unwrap_or(domain_min),
            max: max.map(clamp).unwrap_or(domain_max),
            domain_min,
            domain_max,
        }
    }

    /// Whether the lower bound constrains anything.
    pub fn constrains_min(&self) -> bool {
        self.min > self.domain_min
    }

    /// Whether the upper bound constrains anything.
    pub fn constrains_max(&self) -> bool {
        self.max < self.domain_max
    }

    /// A filter is active when either bound is tighter than its domain edge.
    pub fn is_active(&self) -> bool {
        self.constrains_min() || self.constrains_max()
    }
}

/// Canonical range filters for every filterable dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackFilters {
    pub energy: RangeFilter<f64>,
    pub danceability: RangeFilter<f64>,
    pub popularity: RangeFilter<i32>,
}

impl Default for TrackFilters {
    fn default() -> Self {
        Self {
            energy: RangeFilter::full(UNIT_MIN, UNIT_MAX),
            danceability: RangeFilter::full(UNIT_MIN, UNIT_MAX),
            popularity: RangeFilter::full(POPULARITY_MIN, POPULARITY_MAX),
        }
    }
}

/// Which dimensions must appear in the executed predicate.
///
/// Computed once during normalization; predicate construction only reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pub energy: bool,
    pub danceability: bool,
    pub popularity: bool,
}

impl ActiveFilters {
    pub fn from_filters(filters: &TrackFilters) -> Self {
        Self {
            energy: filters.energy.is_active(),
            danceability: filters.danceability.is_active(),
            popularity: filters.popularity.is_active(),
        }
    }

    pub fn any(&self) -> bool {
        self.energy || self.danceability || self.popularity
    }
}

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
    pub skip: i64,
}

impl PageWindow {
    /// Resolve a page/limit pair. `page` is clamped to >= 1; a non-positive
    /// `limit` falls back to the default; `limit` never exceeds `cap`.
    pub fn resolve(page: Option<i64>, limit: Option<i64>, cap: i64) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = match limit {
            Some(l) if l > 0 => l.min(cap),
            _ => DEFAULT_PAGE_LIMIT.min(cap),
        };
        let skip = (page - 1).saturating_mul(limit);
        Self { page, limit, skip }
    }

    /// The first page at the given size.
    pub fn first(limit: i64) -> Self {
        Self {
            page: 1,
            limit,
            skip: 0,
        }
    }
}

/// Fully normalized listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTrackQuery {
    pub search: Option<SearchTerm>,
    pub filters: TrackFilters,
    pub active: ActiveFilters,
    pub page: PageWindow,
}

impl NormalizedTrackQuery {
    /// Normalize raw parameters, capping page size at `limit_cap`.
    pub fn from_params(params: &TrackListParams, limit_cap: i64) -> Self {
        let filters = TrackFilters {
            energy: RangeFilter::resolve(
                parse_unit(params.energy_min.as_deref()),
                parse_unit(params.energy_max.as_deref()),
                UNIT_MIN,
                UNIT_MAX,
            ),
            danceability: RangeFilter::resolve(
                parse_unit(params.danceability_min.as_deref()),
                parse_unit(params.danceability_max.as_deref()),
                UNIT_MIN,
                UNIT_MAX,
            ),
            popularity: RangeFilter::resolve(
                parse_int(params.popularity_min.as_deref()),
                parse_int(params.popularity_max.as_deref()),
                POPULARITY_MIN,
                POPULARITY_MAX,
            ),
        };

        Self {
            search: params.search.as_deref().and_then(SearchTerm::parse),
            active: ActiveFilters::from_filters(&filters),
            filters,
            page: PageWindow::resolve(
                parse_i64(params.page.as_deref()),
                parse_i64(params.limit.as_deref()),
                limit_cap,
            ),
        }
    }

    /// Unfiltered browse over the first `limit` rows.
    pub fn browse_all(limit: i64) -> Self {
        let filters = TrackFilters::default();
        Self {
            search: None,
            active: ActiveFilters::from_filters(&filters),
            filters,
            page: PageWindow::first(limit),
        }
    }
}

/// Parse a finite float; anything else is treated as absent.
pub fn parse_unit(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse an integer bound. Decimal text is truncated toward zero.
pub fn parse_int(raw: Option<&str>) -> Option<i32> {
    let raw = raw?.trim();
    if let Ok(v) = raw.parse::<i32>() {
        return Some(v);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}

fn parse_i64(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim).and_then(|s| s.parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TrackListParams {
        TrackListParams::default()
    }

    #[test]
    fn absent_params_resolve_to_domain_defaults() {
        let q = NormalizedTrackQuery::from_params(&params(), BULK_LISTING_CAP);
        assert_eq!(q.filters, TrackFilters::default());
        assert_eq!(q.active, ActiveFilters::default());
        assert!(q.search.is_none());
        assert_eq!(q.page, PageWindow { page: 1, limit: 50, skip: 0 });
    }

    #[test]
    fn explicit_full_range_is_inactive() {
        let p = TrackListParams {
            energy_min: Some("0".into()),
            energy_max: Some("1".into()),
            danceability_min: Some("0".into()),
            danceability_max: Some("1".into()),
            popularity_min: Some("0".into()),
            popularity_max: Some("100".into()),
            ..params()
        };
        let q = NormalizedTrackQuery::from_params(&p, BULK_LISTING_CAP);
        assert!(!q.active.any());
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let p = TrackListParams {
            energy_min: Some("abc".into()),
            energy_max: Some("".into()),
            danceability_min: Some("NaN".into()),
            danceability_max: Some("inf".into()),
            popularity_min: Some("lots".into()),
            popularity_max: Some("9x".into()),
            page: Some("first".into()),
            limit: Some("-".into()),
            ..params()
        };
        let q = NormalizedTrackQuery::from_params(&p, BULK_LISTING_CAP);
        assert_eq!(q.filters, TrackFilters::default());
        assert!(!q.active.any());
        assert_eq!(q.page, PageWindow { page: 1, limit: 50, skip: 0 });
    }

    #[test]
    fn tightened_bound_activates_only_its_dimension() {
        let p = TrackListParams {
            energy_min: Some("0.2".into()),
            ..params()
        };
        let q = NormalizedTrackQuery::from_params(&p, BULK_LISTING_CAP);
        assert_eq!(
            q.active,
            ActiveFilters {
                energy: true,
                danceability: false,
                popularity: false
            }
        );
        assert!(q.filters.energy.constrains_min());
        assert!(!q.filters.energy.constrains_max());
    }

    #[test]
    fn upper_bound_alone_activates() {
        let p = TrackListParams {
            popularity_max: Some("60".into()),
            ..params()
        };
        let q = NormalizedTrackQuery::from_params(&p, BULK_LISTING_CAP);
        assert!(q.active.popularity);
        assert_eq!(q.filters.popularity.max, 60);
    }

    #[test]
    fn out_of_domain_values_are_clamped() {
        let p = TrackListParams {
            energy_min: Some("-3".into()),
            energy_max: Some("7".into()),
            popularity_max: Some("250".into()),
            ..params()
        };
        let q = NormalizedTrackQuery::from_params(&p, BULK_LISTING_CAP);
        assert_eq!(q.filters.energy.min, 0.0);
        assert_eq!(q.filters.energy.max, 1.0);
        assert_eq!(q.filters.popularity.max, 100);
        assert!(!q.active.any());
    }

    #[test]
    fn popularity_decimal_is_truncated() {
        assert_eq!(parse_int(Some("70.9")), Some(70));
        assert_eq!(parse_int(Some(" 42 ")), Some(42));
        assert_eq!(parse_int(Some("x")), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn search_whitespace_means_browse() {
        let p = TrackListParams {
            search: Some("   ".into()),
            ..params()
        };
        let q = NormalizedTrackQuery::from_params(&p, BULK_LISTING_CAP);
        assert!(q.search.is_none());
    }

    #[test]
    fn page_window_math() {
        assert_eq!(
            PageWindow::resolve(Some(3), Some(20), BULK_LISTING_CAP),
            PageWindow { page: 3, limit: 20, skip: 40 }
        );
        assert_eq!(
            PageWindow::resolve(Some(0), Some(10), BULK_LISTING_CAP),
            PageWindow { page: 1, limit: 10, skip: 0 }
        );
        assert_eq!(
            PageWindow::resolve(Some(-4), None, BULK_LISTING_CAP),
            PageWindow { page: 1, limit: 50, skip: 0 }
        );
    }

    #[test]
    fn non_positive_limit_uses_default() {
        assert_eq!(PageWindow::resolve(None, Some(0), BULK_LISTING_CAP).limit, 50);
        assert_eq!(PageWindow::resolve(None, Some(-5), BULK_LISTING_CAP).limit, 50);
    }

    #[test]
    fn limit_is_capped() {
        assert_eq!(PageWindow::resolve(None, Some(50_000), BULK_LISTING_CAP).limit, 2000);
        assert_eq!(PageWindow::resolve(None, None, 10).limit, 10);
    }

    #[test]
    fn browse_all_has_no_active_filters() {
        let q = NormalizedTrackQuery::browse_all(BULK_LISTING_CAP);
        assert!(!q.active.any());
        assert_eq!(q.page.limit, 2000);
        assert_eq!(q.page.skip, 0);
    }
}
