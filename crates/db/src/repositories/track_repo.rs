//! Repository for the `tracks` table: CRUD plus paginated two-mode listing.

use catalog_core::retrieval::{
    BoundValue, RangeClause, RetrievalMode, RetrievalPlan, SortOrder, TrackPage,
};
use catalog_core::search::{
    SearchTerm, PREFIX_MATCH_BONUS, SUBSTRING_MATCH_BONUS, TYPO_MATCH_BONUS,
};
use catalog_core::types::DbId;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use crate::models::track::{CreateTrack, Projection, Track, UpdateTrack, FULL_COLUMNS};

/// Window-function column carrying the total match count on every page row.
const TOTAL_COUNT_COLUMN: &str = "total_count";

/// Provides CRUD and listing operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row.
    ///
    /// `name` and `genre` are stored trimmed; the artist search text is
    /// derived from the artist credit.
    pub async fn create(pool: &PgPool, input: &CreateTrack) -> Result<Track, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks (name, artist_name, artist_search, genre, explicit, duration_ms, \
                popularity, danceability, energy, valence, tempo, num_artists) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {FULL_COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(input.name.trim())
            .bind(Json(&input.artist_name))
            .bind(input.artist_name.search_text())
            .bind(input.genre.trim())
            .bind(input.explicit)
            .bind(input.duration_ms)
            .bind(input.popularity)
            .bind(input.danceability)
            .bind(input.energy)
            .bind(input.valence)
            .bind(input.tempo)
            .bind(input.num_artists)
            .fetch_one(pool)
            .await
    }

    /// Find a track by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {FULL_COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Only non-`None` fields change.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET \
                name = COALESCE($2, name), \
                artist_name = COALESCE($3, artist_name), \
                artist_search = COALESCE($4, artist_search), \
                genre = COALESCE($5, genre), \
                explicit = COALESCE($6, explicit), \
                duration_ms = COALESCE($7, duration_ms), \
                popularity = COALESCE($8, popularity), \
                danceability = COALESCE($9, danceability), \
                energy = COALESCE($10, energy), \
                valence = COALESCE($11, valence), \
                tempo = COALESCE($12, tempo), \
                num_artists = COALESCE($13, num_artists) \
             WHERE id = $1 \
             RETURNING {FULL_COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.artist_name.as_ref().map(Json))
            .bind(input.artist_name.as_ref().map(|a| a.search_text()))
            .bind(input.genre.as_deref().map(str::trim))
            .bind(input.explicit)
            .bind(input.duration_ms)
            .bind(input.popularity)
            .bind(input.danceability)
            .bind(input.energy)
            .bind(input.valence)
            .bind(input.tempo)
            .bind(input.num_artists)
            .fetch_optional(pool)
            .await
    }

    /// Delete a track. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tracks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count every track in the collection.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tracks")
            .fetch_one(pool)
            .await
    }

    /// Execute a retrieval plan and return one page plus pagination metadata.
    ///
    /// The slice and its total come from one `REPEATABLE READ` snapshot: the
    /// total rides along each row as a window count, and a separate count is
    /// only issued (inside the same transaction) when the slice is empty.
    pub async fn search_page<T>(
        pool: &PgPool,
        plan: &RetrievalPlan,
        projection: Projection,
    ) -> Result<TrackPage<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new("");
        push_page_query(&mut builder, plan, projection);
        let rows = builder.build().fetch_all(&mut *tx).await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>(TOTAL_COUNT_COLUMN)?,
            None if plan.window.skip == 0 => 0,
            None => {
                let mut count = QueryBuilder::<Postgres>::new("");
                push_count_query(&mut count, plan);
                count
                    .build_query_scalar::<i64>()
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        tx.commit().await?;

        let records = rows
            .iter()
            .map(|row| T::from_row(row))
            .collect::<Result<Vec<T>, _>>()?;

        tracing::debug!(
            mode = mode_label(plan),
            ranges = plan.ranges.len(),
            returned = records.len(),
            total,
            "Executed track retrieval plan"
        );

        Ok(TrackPage::new(records, total, plan.window))
    }
}

fn mode_label(plan: &RetrievalPlan) -> &'static str {
    match plan.mode {
        RetrievalMode::Text(_) => "text",
        RetrievalMode::Browse => "browse",
    }
}

// ---------------------------------------------------------------------------
// SQL rendering
// ---------------------------------------------------------------------------

/// Render the page query: projection, window count, filters, order, slice.
pub(crate) fn push_page_query(
    builder: &mut QueryBuilder<'_, Postgres>,
    plan: &RetrievalPlan,
    projection: Projection,
) {
    builder.push("SELECT ");
    builder.push(projection.columns());
    builder.push(", COUNT(*) OVER () AS ");
    builder.push(TOTAL_COUNT_COLUMN);
    builder.push(" FROM tracks");
    push_filters(builder, plan);

    match (&plan.order, &plan.mode) {
        (SortOrder::Relevance, RetrievalMode::Text(term)) => {
            builder.push(" ORDER BY ");
            push_relevance(builder, term);
            builder.push(" DESC, id");
        }
        _ => {
            builder.push(" ORDER BY popularity DESC, id");
        }
    }

    builder.push(" LIMIT ");
    builder.push_bind(plan.window.limit);
    builder.push(" OFFSET ");
    builder.push_bind(plan.window.skip);
}

/// Render a bare count over the same filters as [`push_page_query`].
pub(crate) fn push_count_query(builder: &mut QueryBuilder<'_, Postgres>, plan: &RetrievalPlan) {
    builder.push("SELECT COUNT(*) FROM tracks");
    push_filters(builder, plan);
}

/// Render the `WHERE` clause: text match (if any) ANDed with active ranges.
/// Nothing is emitted when there is neither.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, plan: &RetrievalPlan) {
    let mut has_where = false;

    if let RetrievalMode::Text(term) = &plan.mode {
        builder.push(" WHERE (");
        push_text_match(builder, term);
        builder.push(")");
        has_where = true;
    }

    for clause in &plan.ranges {
        push_range(builder, clause, &mut has_where);
    }
}

fn push_range(builder: &mut QueryBuilder<'_, Postgres>, clause: &RangeClause, has_where: &mut bool) {
    let column = clause.column.column_name();
    for (op, bound) in [(" >= ", clause.min), (" <= ", clause.max)] {
        let Some(bound) = bound else { continue };
        builder.push(if *has_where { " AND " } else { " WHERE " });
        *has_where = true;
        builder.push(column);
        builder.push(op);
        match bound {
            BoundValue::Float(v) => builder.push_bind(v),
            BoundValue::Int(v) => builder.push_bind(v),
        };
    }
}

/// Candidate test per searchable column: case-insensitive phrase
/// containment, a word run within one character edit, or trigram word
/// similarity.
fn push_text_match(builder: &mut QueryBuilder<'_, Postgres>, term: &SearchTerm) {
    for (i, column) in ["name", "artist_search"].into_iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(column);
        builder.push(" ILIKE ");
        builder.push_bind(term.contains_pattern());
        builder.push(" OR phrase_within_one_edit(");
        builder.push(column);
        builder.push(", ");
        builder.push_bind(term.as_str().to_string());
        builder.push(") OR ");
        builder.push_bind(term.as_str().to_string());
        builder.push(" <% ");
        builder.push(column);
    }
}

/// Relevance score: per column, a prefix/substring/typo bonus plus trigram
/// word similarity; the better of the two columns wins.
fn push_relevance(builder: &mut QueryBuilder<'_, Postgres>, term: &SearchTerm) {
    builder.push("GREATEST(");
    for (i, column) in ["name", "artist_search"].into_iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        builder.push("(CASE WHEN ");
        builder.push(column);
        builder.push(" ILIKE ");
        builder.push_bind(term.prefix_pattern());
        builder.push(format!(" THEN {PREFIX_MATCH_BONUS:.1}::float8 WHEN "));
        builder.push(column);
        builder.push(" ILIKE ");
        builder.push_bind(term.contains_pattern());
        builder.push(format!(
            " THEN {SUBSTRING_MATCH_BONUS:.1}::float8 WHEN phrase_within_one_edit("
        ));
        builder.push(column);
        builder.push(", ");
        builder.push_bind(term.as_str().to_string());
        builder.push(format!(
            ") THEN {TYPO_MATCH_BONUS:.1}::float8 ELSE 0.0::float8 END + word_similarity("
        ));
        builder.push_bind(term.as_str().to_string());
        builder.push(", ");
        builder.push(column);
        builder.push(")::float8)");
    }
    builder.push(")");
}

#[cfg(test)]
mod tests {
    use catalog_core::filters::{NormalizedTrackQuery, TrackListParams, BULK_LISTING_CAP};

    use super::*;

    fn plan(params: TrackListParams) -> RetrievalPlan {
        RetrievalPlan::from_query(&NormalizedTrackQuery::from_params(&params, BULK_LISTING_CAP))
    }

    fn render(plan: &RetrievalPlan) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_page_query(&mut builder, plan, Projection::Full);
        builder.sql().to_string()
    }

    #[test]
    fn default_browse_has_no_where_clause() {
        let sql = render(&plan(TrackListParams {
            energy_min: Some("0".into()),
            energy_max: Some("1".into()),
            danceability_min: Some("0".into()),
            danceability_max: Some("1".into()),
            popularity_min: Some("0".into()),
            popularity_max: Some("100".into()),
            ..Default::default()
        }));
        assert!(!sql.contains("WHERE"), "unexpected predicate in: {sql}");
        assert!(sql.contains("ORDER BY popularity DESC, id LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn active_ranges_are_conjunctive() {
        let sql = render(&plan(TrackListParams {
            energy_min: Some("0.3".into()),
            popularity_min: Some("70".into()),
            popularity_max: Some("90".into()),
            ..Default::default()
        }));
        assert!(sql.contains(
            " WHERE energy >= $1 AND popularity >= $2 AND popularity <= $3 ORDER BY popularity DESC"
        ));
        assert!(!sql.contains("danceability >="));
        assert!(!sql.contains("danceability <="));
    }

    #[test]
    fn text_mode_orders_by_relevance_not_popularity() {
        let sql = render(&plan(TrackListParams {
            search: Some("love".into()),
            energy_min: Some("0.2".into()),
            energy_max: Some("1".into()),
            ..Default::default()
        }));
        assert!(sql.contains(
            "name ILIKE $1 OR phrase_within_one_edit(name, $2) OR $3 <% name \
             OR artist_search ILIKE $4 OR phrase_within_one_edit(artist_search, $5) \
             OR $6 <% artist_search"
        ));
        assert!(sql.contains(") AND energy >= $7 ORDER BY GREATEST("));
        assert!(!sql.contains("energy <="));
        assert!(!sql.contains("ORDER BY popularity"));
        assert!(sql.contains("word_similarity("));
    }

    #[test]
    fn text_mode_without_ranges_has_only_match_predicate() {
        let sql = render(&plan(TrackListParams {
            search: Some("love".into()),
            ..Default::default()
        }));
        assert!(!sql.contains("energy >="));
        assert!(!sql.contains("popularity >="));
        assert!(!sql.contains(") AND "));
    }

    #[test]
    fn count_query_shares_filters() {
        let p = plan(TrackListParams {
            danceability_max: Some("0.4".into()),
            ..Default::default()
        });
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_count_query(&mut builder, &p);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM tracks WHERE danceability <= $1"
        );
    }

    #[test]
    fn summary_projection_selects_summary_columns() {
        let p = plan(TrackListParams::default());
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_page_query(&mut builder, &p, Projection::Summary);
        let sql = builder.sql();
        assert!(sql.starts_with("SELECT id, name, artist_name, genre, explicit, popularity,"));
        assert!(!sql.contains("num_artists"));
    }
}
