//! Artist details endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::Artist;
use crate::AppState;

/// GET /musify/music-artist/details/:mbid
///
/// Returns the aggregated artist, or an empty 404 if MusicBrainz does not
/// know the id. A malformed id is rejected by the path extractor.
pub async fn get_artist_details(
    State(state): State<AppState>,
    Path(mbid): Path<Uuid>,
) -> ApiResult<Json<Artist>> {
    let artist = state.aggregator.resolve(mbid).await?;
    Ok(Json(artist))
}

/// Build artist routes
pub fn artist_routes() -> Router<AppState> {
    Router::new().route("/musify/music-artist/details/:mbid", get(get_artist_details))
}
