use serde::Deserialize;

use crate::draft::Draft;

/// One reason a draft can't be submitted yet.
///
/// Positions are 1-based, the way they are shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Name is empty")]
    NameEmpty,
    #[error("Description is empty")]
    DescriptionEmpty,
    #[error("Type is empty")]
    TypeEmpty,
    #[error("Tags are empty")]
    TagsEmpty,
    #[error("Tag nr {0} is empty")]
    TagEmpty(usize),
    #[error("Ingredients are empty")]
    IngredientsEmpty,
    #[error("Ingredient nr {0} is not set properly")]
    IngredientIncomplete(usize),
    #[error("Image nr {position} is too big. Should be at most {max_bytes} bytes")]
    ImageTooBig { position: usize, max_bytes: usize },
    #[error("Image nr {position} has unsupported type {media_type}")]
    ImageWrongType { position: usize, media_type: String },
}

/// Limits on the images attached to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImagePolicy {
    /// Largest accepted image, inclusive
    pub max_bytes: usize,
    pub accepted_types: Vec<String>,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_bytes: 1024 * 1024,
            accepted_types: vec!["image/jpeg".into(), "image/png".into()],
        }
    }
}

/// Check a draft with the default image policy.
pub fn validate(draft: &Draft) -> Vec<Violation> {
    validate_with(draft, &ImagePolicy::default())
}

/// Run every check against the draft and return all the violations found, in check order.
///
/// An empty list means the draft can be submitted.
pub fn validate_with(draft: &Draft, policy: &ImagePolicy) -> Vec<Violation> {
    let mut violations = vec![];

    if draft.name.is_empty() {
        violations.push(Violation::NameEmpty);
    }
    if draft.description.is_empty() {
        violations.push(Violation::DescriptionEmpty);
    }
    if draft.recipe_type.is_empty() {
        violations.push(Violation::TypeEmpty);
    }

    if draft.tags.is_empty() {
        violations.push(Violation::TagsEmpty);
    }
    for (index, tag) in draft.tags.iter().enumerate() {
        if tag.is_placeholder() {
            violations.push(Violation::TagEmpty(index + 1));
        }
    }

    if draft.ingredients.is_empty() {
        violations.push(Violation::IngredientsEmpty);
    }
    for (index, line) in draft.ingredients.iter().enumerate() {
        if !line.is_complete() {
            violations.push(Violation::IngredientIncomplete(index + 1));
        }
    }

    for (index, image) in draft.images.iter().enumerate() {
        if image.size() > policy.max_bytes {
            violations.push(Violation::ImageTooBig {
                position: index + 1,
                max_bytes: policy.max_bytes,
            });
        }
        if !policy
            .accepted_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&image.media_type))
        {
            violations.push(Violation::ImageWrongType {
                position: index + 1,
                media_type: image.media_type.clone(),
            });
        }
    }

    violations
}

/// The user-facing text of each violation.
pub fn messages(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::ImageAttachment;
    use cookbook::basic_models::{Ingredient, IngredientLine, Tag};

    fn pancakes() -> Draft {
        let mut draft = Draft {
            name: "Pancakes".into(),
            description: "Fluffy".into(),
            recipe_type: "BREAKFAST".into(),
            ..Default::default()
        };
        draft.tags.add(Tag {
            id: 3,
            name: "Sweet".into(),
            tag_type: "Flavor".into(),
        });
        draft.ingredients.add(IngredientLine {
            id: None,
            ingredient_ref: Ingredient {
                id: 1,
                name: "Flour".into(),
            },
            quantity: 200,
            quantity_type: "g".into(),
        });
        draft
    }

    #[test]
    fn empty_draft_reports_every_missing_section() {
        let violations = validate(&Draft::new());
        assert_eq!(
            messages(&violations),
            vec![
                "Name is empty",
                "Description is empty",
                "Type is empty",
                "Tags are empty",
                "Ingredients are empty",
            ]
        );
    }

    #[test]
    fn complete_draft_passes() {
        assert_eq!(validate(&pancakes()), vec![]);
    }

    #[test]
    fn oversized_png_is_the_only_violation() {
        let mut draft = pancakes();
        draft
            .images
            .push(ImageAttachment::new("image/png", vec![0; 2 * 1024 * 1024]));
        assert_eq!(
            validate(&draft),
            vec![Violation::ImageTooBig {
                position: 1,
                max_bytes: 1024 * 1024
            }]
        );
    }

    #[test]
    fn image_limit_is_inclusive() {
        let mut draft = pancakes();
        draft
            .images
            .push(ImageAttachment::new("image/jpeg", vec![0; 1024 * 1024]));
        assert_eq!(validate(&draft), vec![]);
    }

    #[test]
    fn wrong_image_types_are_reported_per_image() {
        let mut draft = pancakes();
        draft.images.push(ImageAttachment::new("image/png", vec![1]));
        draft.images.push(ImageAttachment::new("image/gif", vec![0; 3 << 20]));
        assert_eq!(
            messages(&validate(&draft)),
            vec![
                "Image nr 2 is too big. Should be at most 1048576 bytes",
                "Image nr 2 has unsupported type image/gif",
            ]
        );
    }

    #[test]
    fn every_incomplete_entry_is_reported_with_its_position() {
        let mut draft = pancakes();
        draft.tags.add(Tag::placeholder());
        draft.tags.add(Tag::placeholder());
        let mut no_unit = draft.ingredients.get_at(0).unwrap().clone();
        no_unit.quantity_type = String::new();
        draft.ingredients.add(no_unit);
        let mut no_quantity = draft.ingredients.get_at(0).unwrap().clone();
        no_quantity.quantity = 0;
        draft.ingredients.add(no_quantity);

        assert_eq!(
            validate(&draft),
            vec![
                Violation::TagEmpty(2),
                Violation::TagEmpty(3),
                Violation::IngredientIncomplete(2),
                Violation::IngredientIncomplete(3),
            ]
        );
        assert_eq!(Violation::TagEmpty(2).to_string(), "Tag nr 2 is empty");
    }

    #[test]
    fn only_quantity_and_unit_make_a_line_complete() {
        let mut draft = pancakes();
        let mut line = IngredientLine::new(Ingredient::default());
        line.quantity = 1;
        line.quantity_type = "cup".into();
        draft.ingredients.add(line);
        assert_eq!(validate(&draft), vec![]);
    }

    #[test]
    fn text_fields_are_checked_as_entered() {
        let mut draft = pancakes();
        draft.name = " ".into();
        draft.description = "\n".into();
        draft.recipe_type = "BRUNCH".into();
        assert_eq!(validate(&draft), vec![]);
    }

    #[test]
    fn blank_looking_draft_with_filled_lines_passes() {
        let mut draft = pancakes();
        draft.name = " ".into();
        draft.recipe_type = "LUNCH".into();
        draft.ingredients.clear();
        let mut line = IngredientLine::new(Ingredient::default());
        line.quantity = 200;
        line.quantity_type = "g".into();
        draft.ingredients.add(line);
        assert_eq!(validate(&draft), vec![]);
    }

    #[test]
    fn validation_is_repeatable() {
        let mut draft = pancakes();
        draft.name.clear();
        draft.tags.add(Tag::placeholder());
        let first = validate(&draft);
        assert_eq!(first, validate(&draft));
        assert_eq!(first, vec![Violation::NameEmpty, Violation::TagEmpty(2)]);
    }

    #[test]
    fn policy_can_be_relaxed() {
        let mut draft = pancakes();
        draft.images.push(ImageAttachment::new("image/webp", vec![0; 10]));
        let policy = ImagePolicy {
            max_bytes: 5,
            accepted_types: vec!["image/webp".into()],
        };
        let violations = validate_with(&draft, &policy);
        assert_eq!(
            violations,
            vec![Violation::ImageTooBig {
                position: 1,
                max_bytes: 5
            }]
        );
        assert_eq!(
            messages(&violations),
            vec!["Image nr 1 is too big. Should be at most 5 bytes"]
        );

        draft.images[0].content_bytes.truncate(5);
        assert_eq!(validate_with(&draft, &policy), vec![]);
    }
}
