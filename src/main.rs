use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use nutri_recommender::{
    article::{loader, sample},
    synthesize, Gender, Recommendation, Recommender, RecommenderConfig, Result, UserSignalBundle,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "nutri-recommender", version, about = "Recommend nutrition articles with TF-IDF similarity")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a synthetic article corpus as CSV
    Sample {
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = "100")]
        count: usize,
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Fit the vector space over a corpus and save the model
    Fit {
        #[arg(long)]
        articles: Option<PathBuf>,
        #[arg(long)]
        model: Option<PathBuf>,
        #[arg(long)]
        max_features: Option<usize>,
    },
    /// Recommend articles for a free-text query
    Query {
        text: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Recommend articles from user signals
    Recommend {
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<Gender>,
        /// detected food item, repeatable
        #[arg(long = "food")]
        foods: Vec<String>,
        #[arg(long)]
        bmi: Option<f64>,
        /// health condition, repeatable
        #[arg(long = "condition")]
        conditions: Vec<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// saved model to query
    #[arg(long, conflicts_with = "articles")]
    model: Option<PathBuf>,
    /// article CSV, fitted on the fly
    #[arg(long)]
    articles: Option<PathBuf>,
    #[arg(long)]
    top_n: Option<usize>,
    /// print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), "{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => RecommenderConfig::load(path)?,
        None => RecommenderConfig::default(),
    };

    match cli.command {
        Command::Sample { output, count, seed } => {
            let corpus = sample::write_sample_csv(&output, count, seed)?;
            info!(path = %output.display(), articles = corpus.len(), seed, "sample dataset written");
        }
        Command::Fit { articles, model, max_features } => {
            let config = RecommenderConfig {
                articles_path: articles.or(config.articles_path),
                max_features: max_features.unwrap_or(config.max_features),
                ..config
            };
            let recommender = Recommender::new(config)?;
            recommender.build_article_vectors();
            let path = recommender.save(model.as_deref())?;
            println!(
                "fitted {} articles, {} features -> {}",
                recommender.corpus().len(),
                recommender.vocabulary_size().unwrap_or(0),
                path.display()
            );
        }
        Command::Query { text, source } => {
            let recommender = open(config, &source)?;
            let results = recommender.recommend_by_query(&text, source.top_n)?;
            print_results(&results, source.json)?;
        }
        Command::Recommend { age, gender, foods, bmi, conditions, source } => {
            let mut signals = UserSignalBundle::new()
                .with_food_items(foods)
                .with_conditions(conditions);
            signals.profile.age = age;
            signals.profile.gender = gender;
            signals.health_status.bmi = bmi;
            info!(query = %synthesize(&signals), "synthesized query");

            let recommender = open(config, &source)?;
            let results = recommender.recommend_for_user(&signals, source.top_n)?;
            print_results(&results, source.json)?;
        }
    }
    Ok(())
}

/// Recommender from `--model`, `--articles` or the configured paths, in that order
fn open(config: RecommenderConfig, source: &SourceArgs) -> Result<Recommender> {
    if let Some(model) = &source.model {
        return Recommender::from_model(model, config);
    }
    if let Some(articles) = &source.articles {
        let recommender = Recommender::from_corpus(loader::load_articles(articles), config)?;
        return Ok(recommender);
    }
    if config.articles_path.is_none() {
        if let Some(model) = config.model_path.clone() {
            return Recommender::from_model(model, config);
        }
    }
    Recommender::new(config)
}

fn print_results(results: &[Recommendation], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(results)
            .map_err(|e| nutri_recommender::RecommenderError::Serialization(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }
    if results.is_empty() {
        println!("no articles available");
        return Ok(());
    }
    println!("{:>4}  {:>8}  {:<48}  {:<24}  {}", "rank", "score", "title", "category", "tags");
    for (rank, r) in results.iter().enumerate() {
        println!(
            "{:>4}  {:>8.4}  {:<48}  {:<24}  {}",
            rank + 1,
            r.similarity_score,
            truncate(&r.title, 48),
            truncate(&r.category, 24),
            r.tags.join(", ")
        );
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
