use std::sync::Arc;

use cookbook::basic_models::{Ingredient, Tag};

use crate::service::RecipeService;

/// The tags and ingredients a user can choose from.
///
/// These are snapshots taken when the form mounts. The form clones entries
/// out of them but never changes them.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub tags: Arc<[Tag]>,
    pub ingredients: Arc<[Ingredient]>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::new(vec![], vec![])
    }
}

impl Catalogs {
    pub fn new(tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            tags: tags.into(),
            ingredients: ingredients.into(),
        }
    }

    /// Fetch both catalogs.
    ///
    /// A catalog that can't be fetched is logged and left empty, so the form
    /// still opens; the user just has nothing to pick from.
    pub async fn load(service: &dyn RecipeService) -> Self {
        let (tags, ingredients) = tokio::join!(service.tags(), service.ingredients());
        let tags = tags.unwrap_or_else(|e| {
            tracing::warn!("Could not load tags: {}", e);
            vec![]
        });
        let ingredients = ingredients.unwrap_or_else(|e| {
            tracing::warn!("Could not load ingredients: {}", e);
            vec![]
        });
        tracing::info!(
            "Loaded {} tags and {} ingredients",
            tags.len(),
            ingredients.len()
        );
        Self::new(tags, ingredients)
    }

    pub fn tag(&self, id: i64) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn tag_named(&self, name: &str) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|tag| tag.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn ingredient(&self, id: i64) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ingredient| ingredient.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn ingredient_named(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients
            .iter()
            .find(|ingredient| ingredient.name.eq_ignore_ascii_case(name.trim()))
    }

    /// The ingredient a new line starts with, if there is any.
    pub fn default_ingredient(&self) -> Option<&Ingredient> {
        self.ingredients.first()
    }
}
