use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use estate_scout::api::{ApiClient, ListingApi};
use estate_scout::forms::{self, ListingForm, MyListings};
use estate_scout::home::HomeFeed;
use estate_scout::models::{Credentials, Listing, ListingDraft};
use estate_scout::search::SearchController;
use estate_scout::storage::{HttpObjectStore, UploadBatcher, UploadFile};
use estate_scout::{Config, SessionStore};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "estate-scout", about = "Browse and publish real-estate listings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the landing page rows (offers, rent, sale)
    Home,
    /// Run a search, e.g. `type=rent&offer=true`
    Search {
        #[arg(default_value = "")]
        query: String,
        /// Extra "show more" pages to fetch
        #[arg(long, default_value_t = 0)]
        pages: usize,
        /// Save the results as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show one listing
    Listing { id: String },
    /// Sign in, upload images and create a listing from a JSON draft
    Publish {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        draft: PathBuf,
        #[arg(long = "image", required = true)]
        images: Vec<PathBuf>,
    },
    /// Sign in and list your own listings
    MyListings {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let api = ApiClient::new(config.api_url.clone(), config.http_timeout)
        .context("Failed to create API client")?;
    let session = SessionStore::new();

    info!("🏠 Estate Scout against {}", api.base_url());

    match cli.command {
        Command::Home => {
            let feed = HomeFeed::load(&api).await;
            print_section("Recent offers", &feed.offers);
            print_section("Recent places for rent", &feed.rent);
            print_section("Recent places for sale", &feed.sale);
        }
        Command::Search { query, pages, out } => {
            let mut search = SearchController::new();
            search.navigate(&api, &query).await?;
            for _ in 0..pages {
                if !search.has_more() {
                    break;
                }
                search.show_more(&api).await?;
            }

            print_section("Listing results", search.listings());
            if search.has_more() {
                info!("More results available, rerun with --pages {}", pages + 1);
            }

            if let Some(path) = out {
                let json = serde_json::to_string_pretty(search.listings())?;
                tokio::fs::write(&path, json).await?;
                info!("💾 Saved {} listings to {}", search.listings().len(), path.display());
            }
        }
        Command::Listing { id } => {
            let listing = api.get_listing(&id).await?;
            print_listing(1, &listing);
            println!("   {}", listing.fields.description);
        }
        Command::Publish {
            email,
            password,
            draft,
            images,
        } => {
            forms::sign_in(&api, &session, &Credentials { email, password }).await?;

            let raw = tokio::fs::read_to_string(&draft)
                .await
                .with_context(|| format!("Failed to read {}", draft.display()))?;
            let fields: ListingDraft = serde_json::from_str(&raw).context("Invalid listing draft")?;

            let mut files = Vec::with_capacity(images.len());
            for path in &images {
                files.push(UploadFile::from_path(path).await?);
            }

            let store = HttpObjectStore::new(config.storage_url.clone(), config.http_timeout)
                .context("Failed to create storage client")?;
            let batcher = UploadBatcher::new(&store);

            let mut form = ListingForm::create();
            form.replace_draft(fields);
            form.attach_images(&batcher, &files).await?;
            let route = form.submit(&api, &session).await?;

            info!("✅ Published, view it at {}", route);
        }
        Command::MyListings { email, password } => {
            forms::sign_in(&api, &session, &Credentials { email, password }).await?;
            let mine = MyListings::load(&api, &session).await?;
            if mine.load_error() {
                anyhow::bail!("Error showing listings");
            }
            print_section("Your listings", mine.listings());
        }
    }

    Ok(())
}

fn print_section(title: &str, listings: &[Listing]) {
    println!("== {} ({}) ==", title, listings.len());
    for (i, listing) in listings.iter().enumerate() {
        print_listing(i + 1, listing);
    }
    println!();
}

fn print_listing(position: usize, listing: &Listing) {
    let fields = &listing.fields;
    println!("{}. {} - {}", position, fields.name, listing.price_label());
    println!("   {}", fields.address);
    println!(
        "   {} bed, {} bath{}{}",
        fields.bedrooms,
        fields.bathrooms,
        if fields.parking { ", parking" } else { "" },
        if fields.furnished { ", furnished" } else { "" }
    );
    if let Some(cover) = listing.cover_image() {
        println!("   Cover: {}", cover);
    }
    println!("   ID: {}", listing.id);
}
