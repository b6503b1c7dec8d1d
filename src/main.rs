use clap::{Parser, Subcommand};
use log::debug;
use recipe_finder::render::{format_time_ago, API_UNAVAILABLE_MESSAGE};
use recipe_finder::{
    recipe_id, Dataset, DatasetSource, FinderConfig, FinderError, HttpStore, OnlineSearch,
    RecipeActivity, RecipeDetail, RecipeSearch, SearchMode,
};
use std::sync::Arc;
use chrono::Utc;

/// Find recipes by the ingredients you have at home.
#[derive(Parser, Debug)]
#[command(name = "recipe-finder", version, about)]
struct Cli {
    /// Dataset path or URL (overrides configuration)
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search recipes by ingredients, e.g. `search tomato, onion`
    Search {
        /// Ingredients, separated by commas or spaces
        #[arg(required = true)]
        ingredients: Vec<String>,

        /// Ask the online recipe API instead of the bundled dataset
        #[arg(long)]
        online: bool,

        /// Use the bundled dataset if the online API fails
        #[arg(long)]
        fallback: bool,

        /// Maximum number of recipes to show
        #[arg(long)]
        limit: Option<usize>,

        /// Print HTML cards instead of text
        #[arg(long)]
        html: bool,
    },
    /// Show one recipe with its ingredients and steps
    Show {
        name: String,

        #[arg(long)]
        html: bool,
    },
    /// Print the identity used for likes, views and comments
    Id { name: String },
    /// Print likes, views and comments from the configured store
    Stats { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = FinderConfig::load()?;
    if let Some(dataset) = cli.dataset {
        config.dataset.source = dataset;
    }
    debug!("{:#?}", config);

    match cli.command {
        Command::Search {
            ingredients,
            online,
            fallback,
            limit,
            html,
        } => {
            let dataset = load_dataset(&config).await;
            let mode = if online {
                SearchMode::Online
            } else {
                SearchMode::Offline
            };

            let mut search = RecipeSearch::builder()
                .ingredients(ingredients.join(" "))
                .mode(mode)
                .limit(limit.unwrap_or(config.search.display_limit))
                .dataset(&dataset)
                .fallback_to_offline(fallback || config.search.fallback_to_offline);
            if online {
                search = search.online(OnlineSearch::new(&config.api)?);
            }

            let outcome = match search.run().await {
                Ok(outcome) => outcome,
                Err(FinderError::Api(reason)) => {
                    eprintln!("{} ({})", API_UNAVAILABLE_MESSAGE, reason);
                    eprintln!("Try offline mode: run the search again without --online");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(notice) = &outcome.notice {
                eprintln!("{}", notice);
            }
            let rendered = outcome.render();
            if html {
                println!("{}", rendered.to_html());
            } else {
                println!("{}", rendered.to_text());
                if outcome.total_matches > outcome.recipes.len() {
                    println!(
                        "\nShowing {} of {} matching recipes",
                        outcome.recipes.len(),
                        outcome.total_matches
                    );
                }
            }
        }
        Command::Show { name, html } => {
            let dataset = load_dataset(&config).await;
            let recipe = dataset
                .find_by_name(&name)
                .or_else(|| dataset.find_by_id(&recipe_id(&name)))
                .ok_or_else(|| format!("No recipe named '{}'", name))?;
            let detail = RecipeDetail::new(recipe);
            if html {
                println!("{}", detail.to_html());
            } else {
                print!("{}", detail.to_text());
            }
        }
        Command::Id { name } => {
            println!("{}", recipe_id(&name));
        }
        Command::Stats { name } => {
            let activity = RecipeActivity::new(Arc::new(HttpStore::new(&config.store)?));
            let id = recipe_id(&name);
            let likes = activity.likes(&id).await?;
            let views = activity.views(&id).await?;
            let comments = activity.comments(&id).await?;

            println!("{} ({})", name, id);
            println!(
                "  likes: {}  views: {}  comments: {}",
                likes,
                views,
                comments.len()
            );
            let now = Utc::now();
            for comment in comments {
                let when = comment
                    .created_at
                    .map(|at| format_time_ago(now, at))
                    .unwrap_or_else(|| "Just now".to_string());
                println!("  - {} ({}): {}", comment.user_name, when, comment.comment);
            }
        }
    }

    Ok(())
}

async fn load_dataset(config: &FinderConfig) -> Dataset {
    let source = DatasetSource::parse(&config.dataset.source);
    let (dataset, error) = Dataset::load_or_empty(&source, config.dataset.timeout()).await;
    if error.is_some() {
        eprintln!("{}", recipe_finder::dataset::LOAD_FAILED_MESSAGE);
    }
    dataset
}
