use anyhow::{bail, Context};
use clap::Parser;
use colored::*;
use log::{error, info, warn};
use repo_documenter::{
    config::Config,
    documenter::{ConfirmMode, RepoDocumenter, RunMode, RunSummary},
    git::{CloneStrategy, RepositorySync},
    github::GhCli,
    llm::{AnthropicClient, TextGenerator},
    logging,
    repository::extract_org_name,
    ui::{parse_repository_names, UI},
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GitHub organization URL or name, e.g. https://github.com/acme
    org_url: String,

    /// Directory that receives the working copies
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated repository names; skips enumeration
    #[arg(short, long)]
    repos: Option<String>,

    /// Only clone and create the docs/ structure
    #[arg(long)]
    clone_only: bool,

    /// Process every repository without asking
    #[arg(short = 'y', long)]
    yes: bool,

    /// Model used for generation
    #[arg(short, long)]
    model: Option<String>,

    /// Pause between repositories in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file; overrides the configured one
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Never use the GitHub CLI
    #[arg(long)]
    no_gh: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(delay) = self.delay_ms {
            config.delay_between_repos_ms = delay;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if self.no_gh {
            config.use_gh_cli = Some(false);
        }
    }

    fn mode(&self) -> RunMode {
        if self.clone_only {
            RunMode::CloneOnly
        } else {
            RunMode::Document
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    let _log_guard = logging::init(&cli.log_level, config.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let ui = UI::new();
    ui.print_banner();

    let mode = cli.mode();
    let require_generation_key = mode == RunMode::Document;

    let org = extract_org_name(&cli.org_url)?;

    let confirm_mode = if cli.yes {
        ConfirmMode::AssumeYes
    } else if ui.is_attended() {
        ConfirmMode::Interactive
    } else {
        bail!("No terminal attached; pass --yes to process repositories without confirmation");
    };

    if confirm_mode == ConfirmMode::Interactive {
        config.api_keys.prompt_missing_keys(require_generation_key)?;
    }
    if let Err(e) = config.validate(require_generation_key).await {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let use_gh = match config.use_gh_cli {
        Some(use_gh) => use_gh,
        None => GhCli::new().is_available().await,
    };
    let strategy = if use_gh {
        info!("Using the GitHub CLI to clone repositories");
        CloneStrategy::GhCli {
            program: GhCli::new().program().to_string(),
        }
    } else {
        info!("Using git to clone repositories");
        CloneStrategy::Git {
            token: config.api_keys.github_token.clone(),
        }
    };

    let sync = RepositorySync::new(strategy);
    let documenter = match mode {
        RunMode::Document => {
            let generator = AnthropicClient::new(&config)?;
            info!("Generating with {}", generator.name());
            RepoDocumenter::new(config, Box::new(generator), sync, confirm_mode)?
        }
        RunMode::CloneOnly => RepoDocumenter::without_generator(config, sync, confirm_mode)?,
    };

    let summary = match cli.repos.as_deref().map(parse_repository_names) {
        Some(names) if !names.is_empty() => {
            documenter.process_repositories(&org, &names, mode).await?
        }
        Some(_) => bail!("--repos was given but contains no repository names"),
        None => documenter.process_organization(&cli.org_url, mode).await?,
    };

    print_summary(&ui, &summary);
    Ok(())
}

fn print_summary(ui: &UI, summary: &RunSummary) {
    ui.print_section("Summary");
    println!("  Documented:  {}", summary.documented);
    println!("  Cloned only: {}", summary.cloned_only);
    println!("  Skipped:     {}", summary.skipped);
    println!("  Failed:      {}", summary.failed.len());

    if summary.is_success() {
        ui.print_info("\nAll selected repositories were processed.");
    } else {
        warn!("Failed repositories: {}", summary.failed.join(", "));
        ui.print_warning(&format!("\nFailed: {}", summary.failed.join(", ")));
    }
}
