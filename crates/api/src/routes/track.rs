use axum::routing::get;
use axum::Router;

use crate::handlers::track;
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// GET    /          list (?search, ranges, page, limit)
/// POST   /          create (admin)
/// GET    /all       bulk listing
/// GET    /{id}      get
/// PUT    /{id}      update (admin)
/// DELETE /{id}      delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(track::list).post(track::create))
        .route("/all", get(track::list_all))
        .route(
            "/{id}",
            get(track::get_by_id)
                .put(track::update)
                .delete(track::delete),
        )
}
