use serde::{Deserialize, Serialize};

/// Response page from the Edamam search endpoint. Fields we do not display
/// are dropped during deserialization.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RecipePage {
    #[serde(default)]
    pub hits: Vec<RecipeHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeHit {
    pub recipe: Recipe,
}

/// Detail endpoint wraps a single recipe the same way a hit does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDocument {
    pub recipe: Recipe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub uri: String,
    pub label: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub diet_labels: Vec<String>,
    #[serde(default)]
    pub health_labels: Vec<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Derived from the URI fragment; the upstream payload does not carry it.
    #[serde(rename = "recipeID", default)]
    pub recipe_id: Option<String>,
}

/// A titled group of recipes on the home page, one per diet preference.
#[derive(Debug, Serialize)]
pub struct Section {
    pub title: String,
    pub recipes: Option<Vec<RecipeHit>>,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub search: Option<String>,
    pub results: Option<Vec<RecipeHit>>,
}

/// The only response shaping the app does: cap the tag list at three entries
/// and expose the recipe's ID, which Edamam only encodes in the URI fragment.
pub fn shape(mut hits: Vec<RecipeHit>) -> Vec<RecipeHit> {
    for hit in &mut hits {
        shape_recipe(&mut hit.recipe);
    }
    hits
}

pub fn shape_recipe(recipe: &mut Recipe) {
    if let Some(tags) = recipe.tags.as_mut() {
        tags.truncate(3);
    }
    recipe.recipe_id = recipe.uri.split('#').nth(1).map(str::to_string);
}
