use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use metachecker::api::{AiProvider, GeminiProvider};
use metachecker::config::Config;
use metachecker::generate::{GenerateRequest, MetadataGenerator};
use metachecker::logging;
use metachecker::metadata::{HttpMetadataFetcher, MetadataFetcher, MetadataRecord};
use metachecker::rest;
use metachecker::wizard::{self, step_for_field, step_view, WIZARD_STEPS};

#[derive(Parser)]
#[command(name = "metachecker")]
#[command(about = "Check, generate and review SEO metadata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page and show its metadata grouped by wizard step
    Check {
        /// Page URL (https:// is assumed)
        url: String,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate optimized metadata with Gemini
    Generate {
        /// Page to improve
        #[arg(long)]
        url: Option<String>,

        /// Free-text description of the page
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Show which wizard step each metadata field belongs to
    Classify {
        /// camelCase field names (e.g., ogImage twitterSite)
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Start the REST API server
    Api {
        /// Port to listen on (default: 7009)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print a JSON Schema
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::Config)]
        kind: SchemaKind,
    },

    /// Write the effective configuration to metachecker.toml
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Config,
    Metadata,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;
    let _logging_handle = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Check { url, json } => cmd_check(&config, &url, json).await?,
        Commands::Generate { url, prompt } => cmd_generate(&config, url, prompt).await?,
        Commands::Classify { fields } => cmd_classify(&fields),
        Commands::Api { port } => cmd_api(&config, port).await?,
        Commands::Schema { kind } => cmd_schema(kind)?,
        Commands::InitConfig { force } => cmd_init_config(&config, force)?,
    }

    Ok(())
}

fn fetcher(config: &Config) -> Result<Arc<dyn MetadataFetcher>> {
    let fetcher = HttpMetadataFetcher::new(&config.fetch).context("Failed to build HTTP client")?;
    Ok(Arc::new(fetcher))
}

async fn cmd_check(config: &Config, url: &str, json: bool) -> Result<()> {
    let record = fetcher(config)?.fetch(url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    print_record(&record);
    Ok(())
}

fn print_record(record: &MetadataRecord) {
    for index in 0..wizard::step_count() {
        let Some(view) = step_view(record, index) else {
            continue;
        };

        println!("{}. {}", index + 1, view.title);
        println!("{}", "─".repeat(60));

        if view.fields.is_empty() {
            println!("  (none)");
        }
        for field in &view.fields {
            println!("  {:<22} {}", field.name, field.value);
        }
        if let Some(length) = &view.length {
            println!("  {} characters {}", length.chars, length.label);
        }
        for rec in &view.recommendations {
            println!(
                "  [{}] {}: {}",
                rec.importance.label(),
                rec.field,
                rec.recommendation
            );
        }
        println!();
    }

    println!("Crawlability");
    println!("{}", "─".repeat(60));
    println!(
        "  robots.txt  {}",
        if record.robots_txt_exists { "found" } else { "missing" }
    );
    println!(
        "  sitemap     {}{}",
        if record.sitemap_exists { "found" } else { "missing" },
        record
            .sitemap_url
            .as_deref()
            .map(|u| format!(" ({})", u))
            .unwrap_or_default()
    );
}

async fn cmd_generate(config: &Config, url: Option<String>, prompt: Option<String>) -> Result<()> {
    let provider = GeminiProvider::from_config(&config.ai)?.map(|p| {
        eprintln!("Generating with {}", p.model());
        Arc::new(p) as Arc<dyn AiProvider>
    });
    let generator = MetadataGenerator::new(fetcher(config)?, provider)?;

    let record = generator.generate(&GenerateRequest { url, prompt }).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    if let Some(analysis) = &record.ai_analysis {
        eprintln!("SEO score: {}/100", analysis.seo_score);
        for missing in &analysis.missing_fields {
            eprintln!(
                "  [{}] {}: {}",
                missing.importance.label(),
                missing.field,
                missing.recommendation
            );
        }
    }
    Ok(())
}

fn cmd_classify(fields: &[String]) {
    let width = fields.iter().map(|f| f.len()).max().unwrap_or(0);
    for field in fields {
        let index = step_for_field(field);
        println!(
            "{:<width$} → {} ({})",
            field,
            index,
            WIZARD_STEPS[index].id,
            width = width
        );
    }
}

async fn cmd_api(config: &Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.rest_api.port);

    println!("Starting REST API server...");
    println!("  Address: {}:{}", config.rest_api.bind, port);
    println!("  Endpoints:");
    println!("    GET  /api/v1/health                   Health check");
    println!("    GET  /api/v1/status                   Server status");
    println!("    GET  /api/v1/metadata?url=            Fetch page metadata");
    println!("    POST /api/v1/generate                 Generate metadata");
    println!("    GET  /api/v1/wizard/steps             List wizard steps");
    println!("    GET  /api/v1/wizard/classify/:field   Classify a field");
    println!("    POST /api/v1/wizard/navigate          Navigate the wizard");
    println!("    POST /api/v1/wizard/steps/:index/view Render a step");
    println!("    GET  /api/v1/openapi.json             OpenAPI document");
    println!("    GET  /api/v1/openapi.yaml             OpenAPI document (YAML)");
    println!();

    let state = rest::ApiState::new(config.clone())?;
    rest::serve(state, &config.rest_api.bind, port).await
}

fn cmd_schema(kind: SchemaKind) -> Result<()> {
    let schema = match kind {
        SchemaKind::Config => schemars::schema_for!(Config),
        SchemaKind::Metadata => schemars::schema_for!(MetadataRecord),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn cmd_init_config(config: &Config, force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    config.save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
