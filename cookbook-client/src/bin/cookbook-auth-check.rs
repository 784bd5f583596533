use anyhow::Result;
use clap::Parser;
use cookbook_client::{
    auth::authorize,
    config::Config,
    service::{HttpRecipeService, RecipeService},
};

/// Check who the server thinks we are, and whether we may create recipes
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// YAML configuration file
    #[arg(long)]
    config: Option<String>,
    /// URL of the server to check, overriding the configuration
    #[arg(long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(server) = args.server {
        config.server = server;
    }
    println!("Checking session with {}...", config.server);
    let service = HttpRecipeService::new_from_env(config);

    let user = match service.current_user().await {
        Ok(user) => user,
        Err(e) => {
            eprintln!("\nError connecting to server!");
            eprintln!("URL: {}", service.config().server);
            return Err(e.into());
        }
    };

    if let Some(user) = &user {
        println!("{}", serde_json::to_string_pretty(user)?);
    }
    match authorize(user) {
        Ok(user) => {
            println!("\n{} may create recipes.", user.username);
            Ok(())
        }
        Err(redirect) => {
            println!("\nThis session may not create recipes (would redirect to {redirect}).");
            std::process::exit(1);
        }
    }
}
