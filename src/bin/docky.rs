use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use javadocky::{
    ApplyMode, Docky, DockyConfig, DocumentWatcher, Documenter, FieldSynchronizer, JavaParser,
    LanguageParser, SourceDocument,
};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "docky",
    about = "Generate Javadoc comments from templates and keep @param descriptions in sync",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add comments to every undocumented declaration of a Java file or source tree
    Apply {
        path: PathBuf,

        /// Template configuration (searched for as .javadocky.toml if not provided)
        #[clap(short, long)]
        config: Option<PathBuf>,

        /// Print what would change without writing files
        #[clap(long)]
        dry_run: bool,
    },
    /// Propagate field comment changes made since `baseline` into @param lines
    Sync {
        file: PathBuf,

        /// Earlier version of the file to compare against
        #[clap(short, long)]
        baseline: PathBuf,

        /// Print the updated file instead of writing it
        #[clap(long)]
        dry_run: bool,
    },
    /// Watch a directory and synchronize @param lines as files are saved
    Watch { dir: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Apply {
            path,
            config,
            dry_run,
        } => apply(path, config, dry_run),
        Command::Sync {
            file,
            baseline,
            dry_run,
        } => sync(file, baseline, dry_run),
        Command::Watch { dir } => {
            let mut watcher = DocumentWatcher::try_new(dir)?;
            let tracked = watcher.prime()?;
            println!("Tracking {} files in {}", tracked, watcher.root().display());
            watcher.run()?;
            Ok(())
        }
    }
}

fn apply(path: PathBuf, templates_path: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let mut config = DockyConfig::new(path);
    config.templates_path = templates_path;
    if dry_run {
        config.mode = ApplyMode::DryRun;
    }

    let templates = config.load_templates()?;
    let mut docky = Docky::try_new(templates)?;
    let report = docky.apply(&config)?;

    for path in &report.changed {
        println!("{}", path.display());
    }
    println!(
        "{} {} comments in {} of {} files",
        if dry_run { "Would add" } else { "Added" },
        report.comments_added,
        report.files_changed,
        report.files_scanned
    );
    Ok(())
}

fn sync(file: PathBuf, baseline: PathBuf, dry_run: bool) -> Result<()> {
    let before = fs::read_to_string(&baseline)
        .with_context(|| format!("failed to read baseline {}", baseline.display()))?;
    let mut parser = JavaParser::try_new()?;
    let mut synchronizer = FieldSynchronizer::new();

    // both versions are parsed under the same path so they count as one container
    let previous = parser.parse_source(&file, before)?;
    synchronizer.observe(&previous, &mut parser)?;

    let mut document = SourceDocument::open(&file)?;
    let current = parser.parse_source(&file, document.text().to_string())?;
    let edits = synchronizer.observe(&current, &mut parser)?;

    let mut tx = document.transaction();
    tx.extend(edits);
    let count = tx.commit()?;

    if dry_run {
        print!("{}", document.text());
    } else if count > 0 {
        document.save()?;
    }
    eprintln!("Rewrote {} comments in {}", count, file.display());
    Ok(())
}
