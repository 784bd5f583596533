use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// A tag that can be attached to a recipe, as listed in the tag catalog.
///
/// A tag with `id == 0` is a placeholder: the user added a slot but has not
/// picked a tag for it yet.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub tag_type: String,
}

impl Tag {
    /// The empty selection used when a new tag slot is added.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == 0
    }
}

/// A canonical ingredient from the ingredient catalog.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

/// One use of an ingredient in a recipe being authored.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    /// Only set once the line has been stored by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The server calls this field `ingredient`.
    #[serde(rename = "ingredient")]
    pub ingredient_ref: Ingredient,
    pub quantity: u32,
    pub quantity_type: String,
}

impl IngredientLine {
    /// A fresh line for `ingredient` with no quantity set yet.
    pub fn new(ingredient_ref: Ingredient) -> Self {
        Self {
            id: None,
            ingredient_ref,
            quantity: 0,
            quantity_type: String::new(),
        }
    }

    /// Whether the line has both a quantity and a unit.
    pub fn is_complete(&self) -> bool {
        self.quantity != 0 && !self.quantity_type.is_empty()
    }
}

/// The roles a user account can have.
#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
    /// Any role this client doesn't know about. Never privileged.
    #[serde(other)]
    Unknown,
}

/// The user behind the current session.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub app_user_role: Role,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl User {
    /// Only enabled administrators may author recipes.
    pub fn can_author_recipes(&self) -> bool {
        self.enabled && self.app_user_role == Role::Admin
    }
}

/// The meal a recipe is meant for.
#[derive(
    Debug,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    IntoStaticStr,
    Display,
    VariantNames,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeType {
    Breakfast,
    Dinner,
    Supper,
}
