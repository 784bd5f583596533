use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cookbook_client::{
    config::Config,
    draft::ImageAttachment,
    errors::FormError,
    form::redirect_for,
    payload,
    service::HttpRecipeService,
    validation::messages,
    AuthoringForm,
};
use tracing_subscriber::EnvFilter;

/// Create a recipe on the recipe server
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// The name of the recipe
    name: String,
    /// Tags to add to the recipe, by catalog name
    tags: Vec<String>,
    /// A short description of the recipe
    #[arg(short, long, default_value = "")]
    description: String,
    /// The recipe type: BREAKFAST, DINNER or SUPPER
    #[arg(short = 't', long = "type", default_value = "")]
    recipe_type: String,
    /// An ingredient line, as `name:quantity:unit`. Repeat for more lines.
    #[arg(short, long = "ingredient")]
    ingredients: Vec<String>,
    /// A jpeg or png image to attach. Repeat for more images.
    #[arg(long = "image")]
    images: Vec<std::path::PathBuf>,
    /// YAML configuration file
    #[arg(long)]
    config: Option<String>,
    /// URL of the server to upload to, overriding the configuration
    #[arg(long)]
    server: Option<String>,
    /// Dry run mode: validate and show the payload, but don't upload
    #[arg(long)]
    dry: bool,
}

/// Split `name:quantity:unit`. The name may itself contain colons.
fn parse_ingredient(line: &str) -> Result<(&str, &str, &str)> {
    let mut parts = line.rsplitn(3, ':');
    let unit = parts.next();
    let quantity = parts.next();
    let name = parts.next();
    match (name, quantity, unit) {
        (Some(name), Some(quantity), Some(unit)) => Ok((name.trim(), quantity, unit.trim())),
        _ => Err(anyhow!(
            "Ingredient {:?} should look like name:quantity:unit",
            line
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(server) = args.server {
        config.server = server;
    }
    let service = HttpRecipeService::new_from_env(config.clone());

    let mut form = match AuthoringForm::mount(&service, &config).await {
        Ok(form) => form,
        Err(e) => {
            if let Some(redirect) = redirect_for(&e) {
                eprintln!("This account can't create recipes (go to {redirect}).");
            }
            return Err(e.into());
        }
    };

    println!("Recipe name: {}", args.name);
    form.set_name(args.name);
    form.set_description(args.description);
    form.set_recipe_type(args.recipe_type);

    for tag_name in &args.tags {
        let index = form.draft().tags.len();
        form.add_tag();
        match form.catalogs().tag_named(tag_name).map(|tag| tag.id) {
            Some(tag_id) => {
                form.select_tag(index, tag_id)?;
            }
            None => tracing::warn!("No tag named {:?} in the catalog", tag_name),
        }
    }

    for line in &args.ingredients {
        let (name, quantity, unit) = parse_ingredient(line)?;
        // An unknown name would otherwise go out as an unset ingredient
        let ingredient_id = form
            .catalogs()
            .ingredient_named(name)
            .map(|i| i.id)
            .ok_or_else(|| anyhow!("No ingredient named {:?} in the catalog", name))?;
        let index = form.draft().ingredients.len();
        form.add_ingredient();
        form.choose_ingredient(index, ingredient_id)?;
        form.set_quantity_text(index, quantity)?;
        form.set_quantity_type(index, unit)?;
    }

    let mut images = vec![];
    for path in &args.images {
        images.push(ImageAttachment::from_path(path).await?);
    }
    form.set_images(images);

    if args.dry {
        let violations = form.validate().to_vec();
        if violations.is_empty() {
            let payload = payload::serialize(form.draft()).context("Serializing recipe")?;
            println!("Recipe upload: {:#?}", payload);
            println!("Dry run mode enabled, skipping upload");
        } else {
            for message in messages(&violations) {
                println!("- {message}");
            }
        }
        return Ok(());
    }

    match form.submit(&service).await {
        Ok(()) => {
            tracing::info!("Recipe uploaded successfully");
            Ok(())
        }
        Err(FormError::Validation(violations)) => {
            eprintln!("The recipe can't be uploaded yet:");
            for message in messages(&violations) {
                eprintln!("- {message}");
            }
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Failed to upload recipe"),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_ingredient;

    #[test]
    fn ingredient_lines_split_from_the_right() {
        assert_eq!(parse_ingredient("Flour:200:g").unwrap(), ("Flour", "200", "g"));
        assert_eq!(
            parse_ingredient("Salt: fine:1:pinch").unwrap(),
            ("Salt: fine", "1", "pinch")
        );
        assert!(parse_ingredient("Flour:200").is_err());
    }
}
