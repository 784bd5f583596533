use std::path::Path;

use anyhow::{anyhow, Context, Result};
use cookbook::basic_models::{IngredientLine, Tag};

use crate::collection::Collection;

/// An image picked for upload. Lives in memory only, for the lifetime of the draft.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: Option<String>,
    pub media_type: String,
    pub content_bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("content_bytes", &self.content_bytes.len())
            .finish()
    }
}

impl ImageAttachment {
    pub fn new(media_type: impl Into<String>, content_bytes: Vec<u8>) -> Self {
        Self {
            file_name: None,
            media_type: media_type.into(),
            content_bytes,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// The file name to upload the image under.
    ///
    /// Unnamed images get `image-{position}.{ext}`, with the extension taken from
    /// the media type (`bin` when it isn't an image type we know).
    pub fn upload_file_name(&self, position: usize) -> String {
        if let Some(file_name) = &self.file_name {
            return file_name.clone();
        }
        let extension = image::ImageFormat::from_mime_type(&self.media_type)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("bin");
        format!("image-{}.{}", position, extension)
    }

    /// Size of the image in bytes.
    pub fn size(&self) -> usize {
        self.content_bytes.len()
    }

    /// Read an image from disk, declaring the media type its content looks like.
    ///
    /// Content that isn't a recognizable image is declared as
    /// `application/octet-stream` and left for validation to reject.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content_bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Reading image {}", path.display()))?;
        let media_type = image::guess_format(&content_bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or("application/octet-stream");
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("Image path {} has no file name", path.display()))?
            .to_string_lossy()
            .into_owned();
        Ok(Self::new(media_type, content_bytes).with_file_name(file_name))
    }
}

/// The recipe being composed on the authoring form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub description: String,
    /// One of the `RecipeType` names, or empty when not chosen yet.
    pub recipe_type: String,
    pub tags: Collection<Tag>,
    pub ingredients: Collection<IngredientLine>,
    pub images: Vec<ImageAttachment>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.description.is_empty()
            && self.recipe_type.is_empty()
            && self.tags.is_empty()
            && self.ingredients.is_empty()
            && self.images.is_empty()
    }

    /// Forget everything, including the image bytes.
    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        self.recipe_type.clear();
        self.tags.clear();
        self.ingredients.clear();
        self.images = Vec::new();
    }
}
