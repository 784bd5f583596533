use std::time::Duration;

use cookbook::basic_models::{Ingredient, IngredientLine, Tag, User};

use crate::auth::{authorize, Redirect};
use crate::catalog::Catalogs;
use crate::collection::{CollectionError, EntryId};
use crate::config::Config;
use crate::draft::{Draft, ImageAttachment};
use crate::errors::{FormError, FormResult, TransportError};
use crate::payload::{self, Payload};
use crate::service::{RecipeService, TransportResult};
use crate::validation::{validate_with, ImagePolicy, Violation};

/// Whether a create request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
}

/// The recipe authoring form.
///
/// Holds the catalogs to pick from, the draft being composed, the violations
/// found by the last submit attempt, and whether a submission is in flight.
/// Every edit goes through the methods here.
#[derive(Debug)]
pub struct AuthoringForm {
    user: User,
    catalogs: Catalogs,
    draft: Draft,
    violations: Vec<Violation>,
    submission: SubmissionState,
    policy: ImagePolicy,
    submit_timeout: Option<Duration>,
}

impl AuthoringForm {
    /// Check the session once, then load the catalogs and open an empty draft.
    pub async fn mount(service: &dyn RecipeService, config: &Config) -> FormResult<Self> {
        let user = service.current_user().await.unwrap_or_else(|e| {
            // Same as nobody being logged in
            tracing::warn!("Could not look up the session user: {}", e);
            None
        });
        let user = authorize(user).map_err(FormError::AuthorizationDenied)?;
        let catalogs = Catalogs::load(service).await;
        Ok(Self::open(user, catalogs, config))
    }

    /// Open the form for a user who has already been authorized.
    pub fn open(user: User, catalogs: Catalogs, config: &Config) -> Self {
        tracing::info!("Opening recipe form for {}", user.username);
        Self {
            user,
            catalogs,
            draft: Draft::new(),
            violations: vec![],
            submission: SubmissionState::Idle,
            policy: config.images.clone(),
            submit_timeout: config.submit_timeout(),
        }
    }

    pub fn with_submit_timeout(mut self, submit_timeout: Duration) -> Self {
        self.submit_timeout = Some(submit_timeout);
        self
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Violations found by the last submit attempt.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    /// The submit button is disabled while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.submission == SubmissionState::Idle
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_recipe_type(&mut self, recipe_type: impl Into<String>) {
        self.draft.recipe_type = recipe_type.into();
    }

    /// Add an empty tag slot at the end.
    pub fn add_tag(&mut self) -> EntryId {
        self.draft.tags.add(Tag::placeholder())
    }

    /// Put the catalog tag `tag_id` in the slot at `index`.
    pub fn select_tag(&mut self, index: usize, tag_id: i64) -> FormResult<Tag> {
        let tag = self
            .catalogs
            .tag(tag_id)
            .cloned()
            .ok_or(FormError::NotInCatalog { kind: "tag", id: tag_id })?;
        Ok(self.draft.tags.update_at(index, tag)?)
    }

    pub fn remove_tag(&mut self, index: usize) -> FormResult<Tag> {
        Ok(self.draft.tags.remove_at(index)?)
    }

    /// Remove a tag slot by id, wherever it has moved to.
    pub fn remove_tag_entry(&mut self, id: EntryId) -> FormResult<Tag> {
        Ok(self.draft.tags.remove(id)?)
    }

    /// Add an ingredient line at the end, starting on the first catalog ingredient.
    pub fn add_ingredient(&mut self) -> EntryId {
        let ingredient = self
            .catalogs
            .default_ingredient()
            .cloned()
            .unwrap_or_default();
        self.draft.ingredients.add(IngredientLine::new(ingredient))
    }

    /// Replace the whole ingredient line at `index`.
    pub fn update_ingredient(
        &mut self,
        index: usize,
        line: IngredientLine,
    ) -> FormResult<IngredientLine> {
        Ok(self.draft.ingredients.update_at(index, line)?)
    }

    /// Point the line at `index` at the catalog ingredient `ingredient_id`.
    pub fn choose_ingredient(&mut self, index: usize, ingredient_id: i64) -> FormResult<()> {
        let ingredient = self.catalog_ingredient(ingredient_id)?;
        self.edit_ingredient(index, |line| line.ingredient_ref = ingredient)
    }

    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> FormResult<()> {
        self.edit_ingredient(index, |line| line.quantity = quantity)
    }

    /// Set the quantity from what the user typed. Anything that isn't a whole number counts as 0.
    pub fn set_quantity_text(&mut self, index: usize, text: &str) -> FormResult<()> {
        self.set_quantity(index, text.trim().parse().unwrap_or(0))
    }

    pub fn set_quantity_type(
        &mut self,
        index: usize,
        quantity_type: impl Into<String>,
    ) -> FormResult<()> {
        let quantity_type = quantity_type.into();
        self.edit_ingredient(index, |line| line.quantity_type = quantity_type)
    }

    pub fn remove_ingredient(&mut self, index: usize) -> FormResult<IngredientLine> {
        Ok(self.draft.ingredients.remove_at(index)?)
    }

    /// Remove an ingredient line by id, wherever it has moved to.
    pub fn remove_ingredient_entry(&mut self, id: EntryId) -> FormResult<IngredientLine> {
        Ok(self.draft.ingredients.remove(id)?)
    }

    /// Replace the selected images, as a file picker does.
    pub fn set_images(&mut self, images: Vec<ImageAttachment>) {
        self.draft.images = images;
    }

    pub fn add_image(&mut self, image: ImageAttachment) {
        self.draft.images.push(image);
    }

    pub fn remove_image(&mut self, index: usize) -> Option<ImageAttachment> {
        (index < self.draft.images.len()).then(|| self.draft.images.remove(index))
    }

    /// Validate the draft and remember the result.
    pub fn validate(&mut self) -> &[Violation] {
        self.violations = validate_with(&self.draft, &self.policy);
        &self.violations
    }

    /// Validate and serialize the draft, and mark the form as in flight.
    ///
    /// Hand the payload to the server, then report the result to `finish_submit`.
    /// The draft stays editable meanwhile, but a successful `finish_submit` resets
    /// all of it, including edits made after this call.
    pub fn begin_submit(&mut self) -> FormResult<Payload> {
        if self.submission == SubmissionState::InFlight {
            return Err(FormError::SubmissionInFlight);
        }
        if !self.validate().is_empty() {
            return Err(FormError::Validation(self.violations.clone()));
        }
        let payload = payload::serialize(&self.draft)?;
        self.submission = SubmissionState::InFlight;
        Ok(payload)
    }

    /// Record how the create request went. Only a success clears the draft, and it
    /// clears the draft as it is now, not as it was sent.
    pub fn finish_submit(&mut self, outcome: TransportResult<()>) -> FormResult<()> {
        if self.submission != SubmissionState::InFlight {
            return Err(FormError::NoSubmissionInFlight);
        }
        self.submission = SubmissionState::Idle;
        match outcome {
            Ok(()) => {
                tracing::info!("Recipe {:?} created", self.draft.name);
                self.draft.reset();
                self.violations.clear();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to create recipe {:?}: {}", self.draft.name, e);
                Err(e.into())
            }
        }
    }

    /// Validate, send and settle the draft in one go.
    ///
    /// Gives up after the configured timeout, if there is one, so the form can't
    /// stay disabled forever.
    pub async fn submit(&mut self, service: &dyn RecipeService) -> FormResult<()> {
        let payload = self.begin_submit()?;
        let request = service.create_recipe(payload);
        let outcome = match self.submit_timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(outcome) => outcome,
                Err(_) => Err(TransportError::Timeout(limit)),
            },
            None => request.await,
        };
        self.finish_submit(outcome)
    }

    fn catalog_ingredient(&self, ingredient_id: i64) -> FormResult<Ingredient> {
        self.catalogs
            .ingredient(ingredient_id)
            .cloned()
            .ok_or(FormError::NotInCatalog {
                kind: "ingredient",
                id: ingredient_id,
            })
    }

    fn edit_ingredient(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut IngredientLine),
    ) -> FormResult<()> {
        let mut line = self
            .draft
            .ingredients
            .get_at(index)
            .cloned()
            .ok_or(CollectionError::IndexOutOfRange {
                index,
                len: self.draft.ingredients.len(),
            })?;
        edit(&mut line);
        self.draft.ingredients.update_at(index, line)?;
        Ok(())
    }
}

/// Where a denied user should be sent, if that's why mounting failed.
pub fn redirect_for(error: &FormError) -> Option<Redirect> {
    match error {
        FormError::AuthorizationDenied(redirect) => Some(*redirect),
        _ => None,
    }
}
