use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    recipes::dto::{shape, shape_recipe, HomeResponse, Recipe, Section, SearchResponse},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/search", get(search))
        .route("/recipe", get(recipe_detail))
        .route("/apitest", get(apitest))
}

/// Home sections: one per stored preference for a logged-in user, a single
/// "Balanced" section for anonymous visitors. An upstream failure is logged
/// and shown as a section with no recipes rather than failing the page.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> Json<HomeResponse> {
    // A logged-in user gets one section per stored preference, even when the
    // list is empty; everyone else gets the balanced default.
    let preferences = match &current {
        Some(claims) => match state.users.find_by_id(claims.id).await {
            Ok(Some(user)) => user.home_preferences,
            Ok(None) => vec!["balanced".to_string()],
            Err(e) => {
                error!(error = %e, "user lookup failed, falling back to balanced");
                vec!["balanced".to_string()]
            }
        },
        None => vec!["balanced".to_string()],
    };

    let mut sections = Vec::with_capacity(preferences.len());
    for diet in preferences {
        let title = format!("{diet} recipes");
        let params = vec![("diet".to_string(), diet)];
        let recipes = match state.recipes.search(&params).await {
            Ok(page) => {
                info!(section = %title, hits = page.hits.len(), "section loaded");
                Some(shape(page.hits))
            }
            Err(e) => {
                error!(error = %e, section = %title, "recipe API request failed");
                None
            }
        };
        sections.push(Section { title, recipes });
    }

    Json(HomeResponse { sections })
}

/// Recipe search. Empty-valued query parameters are dropped before the
/// upstream call; without a `q` term no call is made at all.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<SearchResponse> {
    let params: Vec<(String, String)> = query
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    let term = params
        .iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.clone());

    if term.is_none() {
        return Json(SearchResponse {
            search: None,
            results: None,
        });
    }

    let results = match state.recipes.search(&params).await {
        Ok(page) => Some(shape(page.hits)),
        Err(e) => {
            error!(error = %e, "recipe API request failed");
            None
        }
    };

    Json(SearchResponse {
        search: term,
        results,
    })
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub id: String,
}

#[instrument(skip(state))]
pub async fn recipe_detail(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> Result<Json<Recipe>, (StatusCode, String)> {
    let mut document = state.recipes.by_id(&query.id).await.map_err(|e| {
        error!(error = %e, id = %query.id, "recipe lookup failed");
        (StatusCode::BAD_GATEWAY, "Recipe request failed".to_string())
    })?;
    shape_recipe(&mut document.recipe);
    Ok(Json(document.recipe))
}

#[derive(Debug, Serialize)]
pub struct ApiTestResponse {
    pub response: u16,
}

/// Connectivity probe against the recipe API.
#[instrument(skip(state))]
pub async fn apitest(
    State(state): State<AppState>,
) -> Result<Json<ApiTestResponse>, (StatusCode, String)> {
    let status = state.recipes.ping().await.map_err(|e| {
        error!(error = %e, "recipe API unreachable");
        (StatusCode::BAD_GATEWAY, "Recipe API unreachable".to_string())
    })?;
    Ok(Json(ApiTestResponse { response: status }))
}
