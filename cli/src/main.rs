//! unplate CLI - boilerplate removal and table reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unplate::{Document, Engine, EngineOptions, JsonFormat, OutputOptions, PageSelection, VariantMode};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "unplate")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Remove boilerplate and rebuild tables in extracted document text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a document and print plain text
    Text {
        /// Input document (JSON dump)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Clean a document and print Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input document (JSON dump)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Split a questionnaire into per-question chunks (JSON)
    Chunks {
        /// Input document (JSON dump)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Show the lines detected as boilerplate
    Analyze {
        /// Input document (JSON dump)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the removal set as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Clean the whole result and print it as JSON
    Json {
        /// Input document (JSON dump)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Convert every JSON document in a directory to Markdown
    Batch {
        /// Directory holding the documents
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (next to the inputs if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by every processing command.
#[derive(Args, Debug, Default)]
struct EngineArgs {
    /// Engine options file (JSON); flags override its values
    #[arg(long, value_name = "FILE", env = "UNPLATE_CONFIG")]
    config: Option<PathBuf>,

    /// Height of the header and footer bands
    #[arg(long, value_name = "POINTS")]
    band_height: Option<f32>,

    /// Fraction of pages a line must appear on to be removed
    #[arg(long, value_name = "RATIO")]
    frequency: Option<f32>,

    /// Similarity needed for two lines to count as the same stamp
    #[arg(long, value_name = "RATIO")]
    similarity: Option<f32>,

    /// Do not emit a separator after the first table row
    #[arg(long)]
    no_header_separator: bool,

    /// Leave form field placeholders untouched
    #[arg(long)]
    no_fields: bool,

    /// Insert form field tokens at the widget positions
    #[arg(long)]
    splice_fields: bool,

    /// Document variant
    #[arg(long, value_enum)]
    questions: Option<QuestionMode>,

    /// Process pages one after another
    #[arg(long)]
    sequential: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum QuestionMode {
    /// Plain document
    Standard,
    /// Questionnaire with numbered question tables
    Structured,
    /// Detect from the document
    Auto,
}

impl From<QuestionMode> for VariantMode {
    fn from(mode: QuestionMode) -> Self {
        match mode {
            QuestionMode::Standard => VariantMode::Standard,
            QuestionMode::Structured => VariantMode::StructuredQuestion,
            QuestionMode::Auto => VariantMode::Auto,
        }
    }
}

impl EngineArgs {
    fn options(&self) -> CliResult<EngineOptions> {
        let mut options = match &self.config {
            Some(path) => EngineOptions::from_json_file(path)?,
            None => EngineOptions::default(),
        };

        if let Some(height) = self.band_height {
            options = options.with_band_height(height);
        }
        if let Some(frequency) = self.frequency {
            options = options.with_frequency_threshold(frequency);
        }
        if let Some(similarity) = self.similarity {
            options = options.with_similarity_threshold(similarity);
        }
        if self.no_header_separator {
            options = options.with_header_separator(false);
        }
        if self.no_fields {
            options = options.with_form_fields(false);
        }
        if self.splice_fields {
            options = options.with_splice_tokens(true);
        }
        if let Some(mode) = self.questions {
            options = options.with_variant_mode(mode.into());
        }
        if self.sequential {
            options = options.sequential();
        }

        options.validate()?;
        log::debug!("Engine options: {:?}", options);
        Ok(options)
    }

    fn engine(&self) -> CliResult<Engine> {
        Ok(Engine::new(self.options()?)?)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Text {
            input,
            output,
            pages,
            engine,
        } => cmd_text(&input, output.as_deref(), pages.as_deref(), &engine),
        Commands::Markdown {
            input,
            output,
            frontmatter,
            pages,
            engine,
        } => cmd_markdown(&input, output.as_deref(), frontmatter, pages.as_deref(), &engine),
        Commands::Chunks {
            input,
            output,
            compact,
            engine,
        } => cmd_chunks(&input, output.as_deref(), compact, engine),
        Commands::Analyze {
            input,
            json,
            engine,
        } => cmd_analyze(&input, json, &engine),
        Commands::Json {
            input,
            output,
            compact,
            engine,
        } => cmd_json(&input, output.as_deref(), compact, &engine),
        Commands::Batch {
            input,
            output,
            frontmatter,
            engine,
        } => cmd_batch(&input, output.as_deref(), frontmatter, &engine),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn page_selection(pages: Option<&str>) -> CliResult<PageSelection> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?),
        None => Ok(PageSelection::All),
    }
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_text(input: &Path, output: Option<&Path>, pages: Option<&str>, args: &EngineArgs) -> CliResult {
    let engine = args.engine()?;
    let doc = Document::from_json_file(input)?;
    let result = engine.process(&doc);

    let options = OutputOptions::new().with_pages(page_selection(pages)?);
    write_output(output, &result.to_text(&options))
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    pages: Option<&str>,
    args: &EngineArgs,
) -> CliResult {
    let engine = args.engine()?;
    let doc = Document::from_json_file(input)?;
    let result = engine.process(&doc);

    let options = OutputOptions::new()
        .with_frontmatter(frontmatter)
        .with_pages(page_selection(pages)?);
    write_output(output, &result.to_markdown(&options))
}

fn cmd_chunks(input: &Path, output: Option<&Path>, compact: bool, mut args: EngineArgs) -> CliResult {
    // chunking only makes sense for questionnaires, so detect unless told otherwise
    if args.questions.is_none() && args.config.is_none() {
        args.questions = Some(QuestionMode::Auto);
    }
    let engine = args.engine()?;
    let doc = Document::from_json_file(input)?;
    let result = engine.process(&doc);

    if !result.variant.is_structured() {
        eprintln!(
            "{} document is not a structured questionnaire; emitting a single chunk",
            "Note:".yellow()
        );
    }

    let chunks = result.chunks();
    let json = unplate::render::to_json(&chunks, json_format(compact))?;
    write_output(output, &format!("{}\n", json))
}

fn cmd_analyze(input: &Path, json: bool, args: &EngineArgs) -> CliResult {
    let engine = args.engine()?;
    let doc = Document::from_json_file(input)?;
    let result = engine.process(&doc);

    if json {
        println!("{}", unplate::render::to_json(&result.removal, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!("{}", "Boilerplate Analysis".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {:?}", "Variant".bold(), result.variant);
    println!("{}: {}", "Form fields".bold(), result.fields.len());
    println!();

    println!("{} ({})", "Removed lines".cyan().bold(), result.removal.len());
    println!("{}", "─".repeat(40).dimmed());
    for (line, regions) in result.removal.iter() {
        let regions: Vec<String> = regions.iter().map(|r| r.to_string()).collect();
        println!("  {} {}", format!("[{}]", regions.join(",")).dimmed(), line);
    }

    println!();
    println!("{}", "Reconstruction Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    let stats = &result.stats;
    println!("{}: {}", "Fragments".bold(), stats.fragment_count);
    println!("{}: {}", "Suppressed".bold(), stats.suppressed_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Fields substituted".bold(), stats.field_count);
    println!("{}: {}", "Words".bold(), stats.word_count);

    Ok(())
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool, args: &EngineArgs) -> CliResult {
    let engine = args.engine()?;
    let doc = Document::from_json_file(input)?;
    let result = engine.process(&doc);

    let options = OutputOptions::new().with_json_format(json_format(compact));
    write_output(output, &format!("{}\n", result.to_json(&options)?))
}

fn cmd_batch(input: &Path, output: Option<&Path>, frontmatter: bool, args: &EngineArgs) -> CliResult {
    let engine = args.engine()?;
    let inputs = collect_inputs(input)?;
    if inputs.is_empty() {
        println!("{} no JSON documents in {}", "Note:".yellow(), input.display());
        return Ok(());
    }

    let output_dir = output.unwrap_or(input);
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let options = OutputOptions::new().with_frontmatter(frontmatter);
    let mut failed = 0usize;
    for path in &inputs {
        let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
        pb.set_message(name.clone());

        match Document::from_json_file(path) {
            Ok(doc) => {
                let markdown = engine.process(&doc).to_markdown(&options);
                fs::write(output_path(output_dir, path), markdown)?;
            }
            Err(e) => {
                failed += 1;
                log::warn!("Skipping {}: {}", name, e);
                pb.println(format!("{} {}: {}", "Skipped".yellow(), name, e));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");
    println!(
        "\n{} {} converted, {} skipped",
        "Batch complete:".green().bold(),
        inputs.len() - failed,
        failed
    );
    Ok(())
}

/// JSON files directly inside `dir`, sorted by name.
fn collect_inputs(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.md", stem))
}

fn cmd_version() {
    println!("{} {}", "unplate".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Boilerplate removal and table reconstruction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.JSON"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let inputs = collect_inputs(dir.path()).unwrap();
        let names: Vec<String> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("/out"), Path::new("/in/report.json"));
        assert_eq!(path, PathBuf::from("/out/report.md"));
    }

    #[test]
    fn test_engine_args_override() {
        let args = EngineArgs {
            band_height: Some(40.0),
            no_header_separator: true,
            questions: Some(QuestionMode::Structured),
            sequential: true,
            ..Default::default()
        };
        let options = args.options().unwrap();

        assert_eq!(options.boilerplate.band_height, 40.0);
        assert!(!options.tables.with_header_separator);
        assert_eq!(options.variant_mode, VariantMode::StructuredQuestion);
        assert!(!options.parallel);
    }

    #[test]
    fn test_engine_args_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{"boilerplate": {"band_height": 50}, "parallel": false}"#).unwrap();

        let args = EngineArgs {
            config: Some(config),
            frequency: Some(0.9),
            ..Default::default()
        };
        let options = args.options().unwrap();
        assert_eq!(options.boilerplate.band_height, 50.0);
        assert_eq!(options.boilerplate.frequency_threshold, 0.9);
        assert!(!options.parallel);
    }

    #[test]
    fn test_engine_args_invalid() {
        let args = EngineArgs {
            similarity: Some(3.0),
            ..Default::default()
        };
        assert!(args.options().is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "unplate",
            "markdown",
            "doc.json",
            "--frontmatter",
            "--questions",
            "auto",
            "--band-height",
            "60",
        ])
        .unwrap();
        match cli.command {
            Commands::Markdown {
                frontmatter, engine, ..
            } => {
                assert!(frontmatter);
                assert_eq!(engine.questions, Some(QuestionMode::Auto));
                assert_eq!(engine.band_height, Some(60.0));
            }
            _ => panic!("expected markdown command"),
        }
    }
}
