use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use resumatch_common::{logger, AppConfig, ResumatchError};
use resumatch_embed::{EmbeddingClient, OllamaClient};
use resumatch_matcher::{artifacts, PipelineContext};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "resumatch")]
#[command(about = "Resumatch - rank job postings against a resume by embedding similarity", long_about = None)]
struct Cli {
    /// How many top matches to report
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Directory for stage artifacts
    #[arg(long, global = true)]
    output_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean, validate and deduplicate raw job postings
    Normalize {
        /// Raw job postings (JSON array of objects)
        #[arg(long)]
        input: PathBuf,
    },

    /// Generate embeddings for normalized postings and the resume
    Embed {
        /// Normalized job postings from the normalize stage
        #[arg(long)]
        jobs: PathBuf,

        /// Resume text file
        #[arg(long)]
        resume: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Rank postings against the resume from saved embedding artifacts
    Rank {
        /// Normalized job postings from the normalize stage
        #[arg(long)]
        jobs: PathBuf,

        /// Job embedding artifact from the embed stage
        #[arg(long)]
        job_embeddings: PathBuf,

        /// Resume embedding artifact from the embed stage
        #[arg(long)]
        resume_embedding: PathBuf,
    },

    /// Run the full pipeline: normalize, embed, rank, report
    Run {
        /// Raw job postings (JSON array of objects)
        #[arg(long)]
        input: PathBuf,

        /// Resume text file
        #[arg(long)]
        resume: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Ask a y/n question on the terminal
fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }

    print!("{} (y/n): ", prompt);
    io::stdout().flush().ok();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

async fn run_normalize(config: &AppConfig, input: &PathBuf) -> Result<()> {
    let raw = artifacts::load_raw_records(input)?;
    let (records, summary) = resumatch_matcher::normalize_records(&raw, config);

    if records.is_empty() {
        return Err(ResumatchError::validation(format!(
            "No valid records remain ({} invalid, {} duplicates out of {})",
            summary.invalid_removed, summary.duplicates_removed, summary.input
        ))
        .into());
    }

    let output = config.artifact_path("clean_jobs.json");
    artifacts::save_records(&output, &records)?;

    println!("Normalization complete:");
    println!("  Input records: {}", summary.input);
    println!("  Kept: {}", summary.kept);
    println!("  Duplicates removed: {}", summary.duplicates_removed);
    println!("  Invalid removed: {}", summary.invalid_removed);
    println!("  Saved to: {}", output.display());
    Ok(())
}

async fn run_embed(
    config: &AppConfig,
    jobs: &PathBuf,
    resume: &PathBuf,
    assume_yes: bool,
) -> Result<()> {
    let records = artifacts::load_records(jobs)?;
    if records.is_empty() {
        return Err(ResumatchError::empty_input("No normalized records to embed").into());
    }
    let resume_text =
        resumatch_matcher::normalize::clean_resume_text(&artifacts::load_resume_text(resume)?);
    if resume_text.is_empty() {
        return Err(ResumatchError::empty_input("Resume text is empty after cleaning").into());
    }

    if !confirm(
        &format!(
            "Embed {} records plus the resume with model '{}'? This may take a while.",
            records.len(),
            config.embedding_model
        ),
        assume_yes,
    ) {
        println!("Cancelled.");
        return Ok(());
    }

    let client = OllamaClient::new(&config.ollama_base_url)?;
    if !client.test_connection().await.unwrap_or(false) {
        tracing::warn!(
            "Could not reach Ollama at {}; the embedding call will retry",
            config.ollama_base_url
        );
    }

    let texts: Vec<String> = records
        .iter()
        .map(|r| resumatch_matcher::compose::compose_record_text(r, config.max_record_text_len))
        .collect();
    let query_text =
        resumatch_matcher::compose::compose_query_text(&resume_text, config.max_query_text_len);

    let pb = spinner(&format!("Embedding {} job texts...", texts.len()));
    let job_vectors = client.embed_batch(&config.embedding_model, &texts).await?;
    pb.set_message("Embedding resume...");
    let query_vector = client.embed(&config.embedding_model, &query_text).await?;
    pb.finish_with_message("Embedding complete");

    // Assemble artifacts only after every call succeeded
    let set = resumatch_matcher::EmbeddingSet::from_records(
        config.embedding_model.clone(),
        &records,
        &job_vectors,
    );
    let query =
        resumatch_matcher::QueryEmbedding::new(config.embedding_model.clone(), query_vector);

    let set_path = config.artifact_path("job_embeddings.json");
    let query_path = config.artifact_path("resume_embedding.json");
    artifacts::save_embedding_set(&set_path, &set)?;
    artifacts::save_query_embedding(&query_path, &query)?;

    println!("Embedding complete:");
    println!("  Records embedded: {}", set.vectors.len());
    println!("  Dimension: {}", set.dimension);
    println!("  Saved to: {}", set_path.display());
    println!("  Saved to: {}", query_path.display());
    Ok(())
}

async fn run_rank(
    config: &AppConfig,
    jobs: &PathBuf,
    job_embeddings: &PathBuf,
    resume_embedding: &PathBuf,
) -> Result<()> {
    let records = artifacts::load_records(jobs)?;
    let set = artifacts::load_embedding_set(job_embeddings)?;
    let query = artifacts::load_query_embedding(resume_embedding)?;

    // All vectors in a run must come from one model
    if set.model != query.model {
        return Err(ResumatchError::validation(format!(
            "Job embeddings were made with '{}' but the resume embedding with '{}'",
            set.model, query.model
        ))
        .into());
    }
    if set.dimension != query.dimension {
        return Err(ResumatchError::dimension_mismatch(format!(
            "Job embedding dimension {} differs from resume dimension {}",
            set.dimension, query.dimension
        ))
        .into());
    }

    let job_vectors = set.vectors_in_order();
    let (matches, stats) =
        resumatch_matcher::rank_matches(&query.embedding, &job_vectors, &records, config.top_n)?;

    let rows = resumatch_matcher::report::match_rows(&matches);
    let output = config.artifact_path("job_matches.json");
    artifacts::save_match_rows(&output, &rows)?;

    print!("{}", resumatch_matcher::render_report(&matches, &stats));
    println!();
    println!("Saved matches to: {}", output.display());
    Ok(())
}

async fn run_full(
    config: &AppConfig,
    input: &PathBuf,
    resume: &PathBuf,
    assume_yes: bool,
) -> Result<()> {
    let raw = artifacts::load_raw_records(input)?;
    let resume_text = artifacts::load_resume_text(resume)?;

    let mut ctx = PipelineContext::new(config.clone());
    ctx.ingest(raw, &resume_text)?;
    ctx.normalize()?;

    let summary = ctx
        .normalize_summary()
        .ok_or_else(|| ResumatchError::internal("Normalize stage produced no summary"))?;
    let clean_path = config.artifact_path("clean_jobs.json");
    artifacts::save_records(&clean_path, ctx.records())?;
    println!(
        "Normalized {} -> {} records ({} duplicates, {} invalid removed)",
        summary.input, summary.kept, summary.duplicates_removed, summary.invalid_removed
    );

    if !confirm(
        &format!(
            "Embed {} records plus the resume with model '{}'? This may take a while.",
            ctx.records().len(),
            config.embedding_model
        ),
        assume_yes,
    ) {
        println!("Cancelled.");
        return Ok(());
    }

    let client = OllamaClient::new(&config.ollama_base_url)?;
    let pb = spinner("Embedding records and resume...");
    let embed_result = ctx.embed(&client).await;
    pb.finish_and_clear();
    embed_result?;

    let set_path = config.artifact_path("job_embeddings.json");
    let query_path = config.artifact_path("resume_embedding.json");
    artifacts::save_embedding_set(&set_path, &ctx.embedding_set())?;
    artifacts::save_query_embedding(&query_path, &ctx.query_embedding())?;

    ctx.rank()?;
    let matches_path = config.artifact_path("job_matches.json");
    artifacts::save_match_rows(&matches_path, &ctx.match_rows())?;

    let report = ctx.report()?;
    print!("{}", report);

    println!();
    println!("Pipeline complete. Artifacts written:");
    println!("  {}", clean_path.display());
    println!("  {}", set_path.display());
    println!("  {}", query_path.display());
    println!("  {}", matches_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root first so CLI
    // argument overrides below win
    load_dotenv_from_project_root();

    if let Some(top_n) = cli.top_n {
        std::env::set_var("TOP_N", top_n.to_string());
    }
    if let Some(output_dir) = &cli.output_dir {
        std::env::set_var("OUTPUT_DIR", output_dir);
    }

    let config = AppConfig::from_env()?;
    config.validate()?;
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Resumatch starting...");
    tracing::info!("  Output dir: {}", config.output_dir.display());
    tracing::info!("  Embedding model: {}", config.embedding_model);
    tracing::info!("  Top N: {}", config.top_n);

    match &cli.command {
        Commands::Normalize { input } => run_normalize(&config, input).await,
        Commands::Embed { jobs, resume, yes } => run_embed(&config, jobs, resume, *yes).await,
        Commands::Rank {
            jobs,
            job_embeddings,
            resume_embedding,
        } => run_rank(&config, jobs, job_embeddings, resume_embedding).await,
        Commands::Run { input, resume, yes } => run_full(&config, input, resume, *yes).await,
    }
}
