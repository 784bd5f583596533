use cookbook::basic_models::{IngredientLine, Tag};
use reqwest::multipart::{Form, Part};

use crate::collection::Collection;
use crate::draft::{Draft, ImageAttachment};

pub const NAME_FIELD: &str = "name";
pub const DESCRIPTION_FIELD: &str = "description";
pub const TYPE_FIELD: &str = "type";
pub const TAGS_FIELD: &str = "tags";
pub const INGREDIENTS_FIELD: &str = "ingredients";
pub const IMAGES_FIELD: &str = "images";

#[derive(thiserror::Error, Debug)]
pub enum PayloadError {
    #[error("Could not encode or decode field {field}: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Payload is missing field {0}")]
    MissingField(&'static str),
    #[error("Unexpected field {0} in payload")]
    UnexpectedField(String),
    #[error("Could not build multipart part: {0}")]
    Part(#[from] reqwest::Error),
}

pub type PayloadResult<T> = std::result::Result<T, PayloadError>;

/// A plain text form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub name: &'static str,
    pub value: String,
}

/// A binary form part. All images share the same field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPart {
    pub name: &'static str,
    pub image: ImageAttachment,
}

/// Everything sent to create a recipe, in the order it goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub text_fields: Vec<TextField>,
    pub binary_parts: Vec<BinaryPart>,
}

impl Payload {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text_fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Convert into a multipart form: text fields first, then the images in order.
    ///
    /// Every image goes out as a file part; unnamed ones get a generated name.
    pub fn into_form(self) -> PayloadResult<Form> {
        let mut form = Form::new();
        for field in self.text_fields {
            form = form.text(field.name, field.value);
        }
        for (index, part) in self.binary_parts.into_iter().enumerate() {
            let file_name = part.image.upload_file_name(index + 1);
            let image = part.image;
            let body = Part::bytes(image.content_bytes)
                .file_name(file_name)
                .mime_str(&image.media_type)?;
            form = form.part(part.name, body);
        }
        Ok(form)
    }
}

/// Turn a draft into the create-recipe payload.
///
/// This doesn't validate anything; run the draft through validation first.
pub fn serialize(draft: &Draft) -> PayloadResult<Payload> {
    let tags = draft.tags.iter().collect::<Vec<_>>();
    let ingredients = draft.ingredients.iter().collect::<Vec<_>>();
    let text_fields = vec![
        TextField {
            name: NAME_FIELD,
            value: draft.name.clone(),
        },
        TextField {
            name: DESCRIPTION_FIELD,
            value: draft.description.clone(),
        },
        TextField {
            name: TYPE_FIELD,
            value: draft.recipe_type.clone(),
        },
        TextField {
            name: TAGS_FIELD,
            value: to_json(TAGS_FIELD, &tags)?,
        },
        TextField {
            name: INGREDIENTS_FIELD,
            value: to_json(INGREDIENTS_FIELD, &ingredients)?,
        },
    ];
    let binary_parts = draft
        .images
        .iter()
        .map(|image| BinaryPart {
            name: IMAGES_FIELD,
            image: image.clone(),
        })
        .collect();
    Ok(Payload {
        text_fields,
        binary_parts,
    })
}

/// Rebuild the draft a payload was made from.
pub fn deserialize(payload: &Payload) -> PayloadResult<Draft> {
    for field in &payload.text_fields {
        if ![
            NAME_FIELD,
            DESCRIPTION_FIELD,
            TYPE_FIELD,
            TAGS_FIELD,
            INGREDIENTS_FIELD,
        ]
        .contains(&field.name)
        {
            return Err(PayloadError::UnexpectedField(field.name.to_string()));
        }
    }
    if let Some(part) = payload.binary_parts.iter().find(|p| p.name != IMAGES_FIELD) {
        return Err(PayloadError::UnexpectedField(part.name.to_string()));
    }
    let required =
        |name: &'static str| payload.text(name).ok_or(PayloadError::MissingField(name));

    let tags: Vec<Tag> = from_json(TAGS_FIELD, required(TAGS_FIELD)?)?;
    let ingredients: Vec<IngredientLine> =
        from_json(INGREDIENTS_FIELD, required(INGREDIENTS_FIELD)?)?;
    Ok(Draft {
        name: required(NAME_FIELD)?.to_string(),
        description: required(DESCRIPTION_FIELD)?.to_string(),
        recipe_type: required(TYPE_FIELD)?.to_string(),
        tags: tags.into_iter().collect::<Collection<_>>(),
        ingredients: ingredients.into_iter().collect::<Collection<_>>(),
        images: payload
            .binary_parts
            .iter()
            .map(|part| part.image.clone())
            .collect(),
    })
}

fn to_json<T: serde::Serialize>(field: &'static str, value: &T) -> PayloadResult<String> {
    serde_json::to_string(value).map_err(|source| PayloadError::Json { field, source })
}

fn from_json<T: serde::de::DeserializeOwned>(field: &'static str, text: &str) -> PayloadResult<T> {
    serde_json::from_str(text).map_err(|source| PayloadError::Json { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use cookbook::basic_models::Ingredient;

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
    fn scalar_fields_and_json_lists_become_text_fields() {
        let draft = pancakes();
        assert!(validate(&draft).is_empty());
        let payload = serialize(&draft).unwrap();

        let names = payload
            .text_fields
            .iter()
            .map(|field| field.name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["name", "description", "type", "tags", "ingredients"]
        );
        assert!(payload.binary_parts.is_empty());
        assert_eq!(payload.text("name"), Some("Pancakes"));
        assert_eq!(payload.text("type"), Some("BREAKFAST"));
        assert_eq!(
            payload.text("tags"),
            Some(r#"[{"id":3,"name":"Sweet","tagType":"Flavor"}]"#)
        );
        assert_eq!(
            payload.text("ingredients"),
            Some(r#"[{"ingredient":{"id":1,"name":"Flour"},"quantity":200,"quantityType":"g"}]"#)
        );
    }

    #[test]
    fn images_keep_their_order_under_one_field_name() {
        let mut draft = pancakes();
        draft
            .images
            .push(ImageAttachment::new("image/png", vec![1, 2]).with_file_name("top.png"));
        draft
            .images
            .push(ImageAttachment::new("image/jpeg", vec![3]).with_file_name("side.jpg"));
        let payload = serialize(&draft).unwrap();
        assert_eq!(payload.binary_parts.len(), 2);
        assert!(payload.binary_parts.iter().all(|p| p.name == IMAGES_FIELD));
        assert_eq!(
            payload.binary_parts[0].image.file_name.as_deref(),
            Some("top.png")
        );
        assert_eq!(payload.binary_parts[1].image.content_bytes, vec![3]);
    }

    #[test]
    fn deserialize_inverts_serialize() {
        let mut draft = pancakes();
        draft.tags.add(Tag {
            id: 9,
            name: "Quick \"weeknight\" ✓".into(),
            tag_type: "Time".into(),
        });
        draft.description = "Line one\nLine two, with ünïcode".into();
        draft
            .images
            .push(ImageAttachment::new("image/jpeg", vec![0xff, 0xd8, 0xff]));
        let payload = serialize(&draft).unwrap();
        assert_eq!(deserialize(&payload).unwrap(), draft);
    }

    #[test]
    fn deserialize_rejects_incomplete_payloads() {
        let mut payload = serialize(&pancakes()).unwrap();
        payload.text_fields.retain(|field| field.name != TAGS_FIELD);
        assert!(matches!(
            deserialize(&payload),
            Err(PayloadError::MissingField("tags"))
        ));

        let mut payload = serialize(&pancakes()).unwrap();
        payload.text_fields[4].value = "{not json".into();
        assert!(matches!(
            deserialize(&payload),
            Err(PayloadError::Json {
                field: "ingredients",
                ..
            })
        ));

        let mut payload = serialize(&pancakes()).unwrap();
        payload.text_fields.push(TextField {
            name: "rating",
            value: "5".into(),
        });
        assert!(matches!(
            deserialize(&payload),
            Err(PayloadError::UnexpectedField(name)) if name == "rating"
        ));
    }

    #[test]
    fn multipart_form_is_built_for_declared_types() {
        let mut draft = pancakes();
        draft
            .images
            .push(ImageAttachment::new("image/png", vec![1, 2, 3]).with_file_name("a.png"));
        let form = serialize(&draft).unwrap().into_form().unwrap();
        assert!(!form.boundary().is_empty());

        draft.images[0].media_type = "not a mime type".into();
        assert!(serialize(&draft).unwrap().into_form().is_err());
    }
}
