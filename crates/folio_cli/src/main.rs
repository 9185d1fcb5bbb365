//! Operator CLI over the content service.
//!
//! # Responsibility
//! - Resolve configuration (`.env` + `FOLIO_*`), start logging, open the store.
//! - Map subcommands onto content service operations and print JSON.
//!
//! # Invariants
//! - Empty listings print `no results` and exit successfully; storage and
//!   input errors exit non-zero.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use folio_core::db::{open_db, open_db_in_memory};
use folio_core::service::query::{parse_category_id, parse_post_id};
use folio_core::{
    core_version, import_seed, init_logging, load_seed_dir, AppConfig, ContentResult,
    ContentService, PostDraft, PostQuery, SqliteCategoryRepository, SqlitePostRepository,
    NO_RESULTS_MESSAGE,
};
use log::info;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio blog content store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the core crate version
    Version,
    /// List posts, filtered by category, id or minimum date (first one given wins)
    Posts {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        min_date: Option<String>,
    },
    /// List published posts, optionally within one category
    Published {
        #[arg(long)]
        category: Option<String>,
    },
    /// Render the landing page data
    Blog {
        #[arg(long)]
        category: Option<String>,
        /// Post to feature instead of the newest one
        #[arg(long)]
        post: Option<String>,
    },
    /// List categories
    Categories,
    /// Create a category
    AddCategory { name: String },
    /// Create a post dated today
    AddPost(AddPostArgs),
    /// Delete a post (no-op when absent)
    DeletePost { id: String },
    /// Delete a category; its posts keep their category id
    DeleteCategory { id: String },
    /// Import categories.json and posts.json (defaults to FOLIO_SEED_DIR)
    Seed { dir: Option<PathBuf> },
}

#[derive(Args, Debug)]
struct AddPostArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    body: String,
    #[arg(long)]
    feature_image: Option<String>,
    /// Publish immediately
    #[arg(long)]
    published: bool,
    #[arg(long)]
    category: Option<String>,
}

impl AddPostArgs {
    fn into_draft(self) -> Result<PostDraft> {
        let mut draft = PostDraft::new(self.title, self.body);
        if let Some(url) = self.feature_image {
            draft = draft.with_feature_image(url);
        }
        if let Some(raw) = self.category.as_deref() {
            draft = draft.with_category(parse_category_id(raw)?);
        }
        // A checkbox-style flag: present means publish.
        if self.published {
            draft = draft.with_published_field("on");
        }
        Ok(draft)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    init_logging(&config.logging).map_err(anyhow::Error::msg)?;

    if let Command::Version = cli.command {
        println!("folio_core version={}", core_version());
        return Ok(());
    }

    let conn = match config.database_path.as_deref() {
        Some(path) => open_db(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
        None => open_db_in_memory()?,
    };

    if let Command::Seed { dir } = &cli.command {
        let dir = dir
            .clone()
            .or_else(|| config.seed_dir.clone())
            .context("no seed directory given and FOLIO_SEED_DIR is unset")?;
        let summary = import_seed(&conn, &load_seed_dir(&dir)?)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "categories": summary.categories,
                "posts": summary.posts,
            }))?
        );
        return Ok(());
    }

    // An in-memory store starts empty on every run; fill it from the seeds.
    if config.database_path.is_none() {
        if let Some(dir) = config.seed_dir.as_deref() {
            import_seed(&conn, &load_seed_dir(dir)?)?;
        }
    }

    let service = ContentService::new(
        SqlitePostRepository::try_new(&conn)?,
        SqliteCategoryRepository::try_new(&conn)?,
    );
    run(&service, cli.command)
}

fn run(
    service: &ContentService<SqlitePostRepository<'_>, SqliteCategoryRepository<'_>>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Posts {
            category,
            id,
            min_date,
        } => {
            let query = PostQuery::from_params(
                category.as_deref(),
                id.as_deref(),
                min_date.as_deref(),
            )?;
            info!("event=cli_command module=cli command=posts query={query:?}");
            print_outcome(service.run_query(&query))
        }
        Command::Published { category } => {
            let outcome = match category.as_deref() {
                Some(raw) => service.list_published_by_category(parse_category_id(raw)?),
                None => service.list_published(),
            };
            print_outcome(outcome)
        }
        Command::Blog { category, post } => {
            let category = category.as_deref().map(parse_category_id).transpose()?;
            let selected = post.as_deref().map(parse_post_id).transpose()?;
            print_outcome(service.blog_page(category, selected))
        }
        Command::Categories => print_outcome(service.list_categories()),
        Command::AddCategory { name } => print_outcome(service.create_category(name)),
        Command::AddPost(args) => {
            let draft = args.into_draft()?;
            print_outcome(service.create_post(Some(draft)))
        }
        Command::DeletePost { id } => {
            let id = parse_post_id(&id)?;
            let removed = service.delete_post_by_id(id)?;
            print_outcome(Ok(json!({ "id": id, "removed": removed })))
        }
        Command::DeleteCategory { id } => {
            let id = parse_category_id(&id)?;
            let removed = service.delete_category_by_id(id)?;
            print_outcome(Ok(json!({ "id": id, "removed": removed })))
        }
        Command::Version | Command::Seed { .. } => Ok(()),
    }
}

fn print_outcome<T: serde::Serialize>(outcome: ContentResult<T>) -> Result<()> {
    match outcome {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(err) if err.is_empty_result() => println!("{NO_RESULTS_MESSAGE}"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    fn add_post(args: &[&str]) -> folio_core::PostDraft {
        let mut argv = vec!["folio", "add-post", "--title", "Hello", "--body", "Words"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::AddPost(args) => args.into_draft().unwrap(),
            _ => panic!("expected add-post"),
        }
    }

    #[test]
    fn published_flag_submits_the_published_field() {
        let draft = add_post(&["--published"]);
        assert!(draft.publish_requested());
        assert_eq!(draft.published.as_deref(), Some("on"));
    }

    #[test]
    fn omitted_published_flag_leaves_the_field_absent() {
        let draft = add_post(&[
            "--category",
            "4",
            "--feature-image",
            "https://img.example/a.png",
        ]);
        assert!(!draft.publish_requested());
        assert_eq!(draft.category_id, Some(4));
        assert_eq!(draft.feature_image.as_deref(), Some("https://img.example/a.png"));
    }

    #[test]
    fn non_numeric_category_is_rejected() {
        let parsed = Cli::try_parse_from([
            "folio", "add-post", "--title", "t", "--body", "b", "--category", "12abc",
        ])
        .unwrap();
        match parsed.command {
            Command::AddPost(args) => assert!(args.into_draft().is_err()),
            _ => panic!("expected add-post"),
        }
    }

    #[test]
    fn posts_filters_parse_as_long_options() {
        let parsed = Cli::try_parse_from(["folio", "posts", "--min-date", "2024-01-15"]).unwrap();
        match parsed.command {
            Command::Posts {
                category,
                id,
                min_date,
            } => {
                assert_eq!(category, None);
                assert_eq!(id, None);
                assert_eq!(min_date.as_deref(), Some("2024-01-15"));
            }
            _ => panic!("expected posts"),
        }
    }
}
