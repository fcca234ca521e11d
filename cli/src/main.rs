//! untxt CLI - plain-text etext structuring tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use untxt::{
    parse_file_with_options, parse_files, Document, JsonFormat, ParseOptions, RenderOptions,
};

#[derive(Parser)]
#[command(name = "untxt")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Structure plain-text etexts into Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert text files to all formats (Markdown, text, JSON)
    Convert {
        /// Input text files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Leave out the header, small print and footer
        #[arg(long)]
        strip_envelope: bool,

        /// Process files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Convert a text file to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Leave out the header, small print and footer
        #[arg(long)]
        strip_envelope: bool,

        /// Keep source line breaks inside paragraphs
        #[arg(long)]
        line_breaks: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        /// Text written for decorative breaks
        #[arg(long, default_value = untxt::render::DEFAULT_BREAK_MARKER)]
        break_marker: String,

        /// Calibration window in lines
        #[arg(long, default_value_t = untxt::parser::DEFAULT_PRELOAD_LINES)]
        preload: usize,
    },

    /// Convert a text file to reflowed plain text
    Text {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Leave out the header, small print and footer
        #[arg(long)]
        strip_envelope: bool,

        /// Keep source line breaks inside paragraphs
        #[arg(long)]
        line_breaks: bool,
    },

    /// Convert a text file to JSON
    Json {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Segment only, skipping envelope and metadata
        #[arg(long)]
        segment_only: bool,
    },

    /// Show document information
    Info {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            inputs,
            output,
            strip_envelope,
            sequential,
        }) => cmd_convert(&inputs, output.as_deref(), strip_envelope, sequential),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            strip_envelope,
            line_breaks,
            max_heading,
            break_marker,
            preload,
        }) => {
            let options = RenderOptions::new()
                .with_frontmatter(frontmatter)
                .with_envelope_stripped(strip_envelope)
                .with_line_breaks(line_breaks)
                .with_max_heading(max_heading)
                .with_break_marker(break_marker);
            cmd_markdown(&input, output.as_deref(), &options, preload)
        }
        Some(Commands::Text {
            input,
            output,
            strip_envelope,
            line_breaks,
        }) => cmd_text(&input, output.as_deref(), strip_envelope, line_breaks),
        Some(Commands::Json {
            input,
            output,
            compact,
            segment_only,
        }) => cmd_json(&input, output.as_deref(), compact, segment_only),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&[input], cli.output.as_deref(), false, false)
            } else {
                println!("{}", "Usage: untxt <FILE> [OUTPUT]".yellow());
                println!("       untxt --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<&Path>,
    strip_envelope: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = match (output, inputs) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, [single]) => {
            let stem = single.file_stem().unwrap_or_default().to_string_lossy();
            PathBuf::from(format!("{}_output", stem))
        }
        (None, _) => PathBuf::from("untxt_output"),
    };
    fs::create_dir_all(&output_dir)?;
    log::debug!("Writing outputs to {}", output_dir.display());

    // Undecodable bytes are replaced so one bad file doesn't stop a batch
    let options = ParseOptions::new().with_parallel(!sequential);
    let render_options = RenderOptions::new()
        .with_frontmatter(true)
        .with_envelope_stripped(strip_envelope);

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing...");
    let results = parse_files(inputs, &options);

    let mut written = Vec::new();
    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        pb.set_message(input.display().to_string());
        match result {
            Ok(doc) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                write_outputs(&doc, &output_dir, &stem, &render_options)?;
                written.push(stem.into_owned());
            }
            Err(e) => {
                pb.println(format!(
                    "{} {}: {}",
                    "Failed".red(),
                    input.display(),
                    e
                ));
                failures += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, stem) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!(
            "  {} {}.md, {}.txt, {}.json",
            branch.dimmed(),
            stem,
            stem,
            stem
        );
    }

    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, inputs.len()).into());
    }
    Ok(())
}

fn write_outputs(
    doc: &Document,
    dir: &Path,
    stem: &str,
    render_options: &RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let markdown = untxt::render::to_markdown(doc, render_options)?;
    fs::write(dir.join(format!("{}.md", stem)), &markdown)?;

    let text = untxt::render::to_text(doc, render_options)?;
    fs::write(dir.join(format!("{}.txt", stem)), &text)?;

    let json = untxt::render::to_json(doc, JsonFormat::Pretty)?;
    fs::write(dir.join(format!("{}.json", stem)), &json)?;

    Ok(())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    render_options: &RenderOptions,
    preload: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ParseOptions::new().with_preload_lines(preload);
    let doc = parse_file_with_options(input, options)?;

    let markdown = untxt::render::to_markdown(&doc, render_options)?;
    emit(output, &markdown)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    strip_envelope: bool,
    line_breaks: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ParseOptions::new();
    let doc = parse_file_with_options(input, options)?;

    let render_options = RenderOptions::new()
        .with_envelope_stripped(strip_envelope)
        .with_line_breaks(line_breaks);

    let text = untxt::render::to_text(&doc, &render_options)?;
    emit(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    segment_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ParseOptions::new();
    if segment_only {
        options = options.segment_only();
    }
    let doc = parse_file_with_options(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = untxt::render::to_json(&doc, format)?;
    emit(output, &json)
}

fn emit(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let encoding = untxt::detect_encoding_from_path(input)?;
    let options = ParseOptions::new();
    let doc = parse_file_with_options(input, options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Encoding".bold(), encoding);
    println!(
        "{}: {} (paragraph sensing {})",
        "Line spacing".bold(),
        doc.profile.line_spacing,
        if doc.profile.paragraph_sensing { "on" } else { "off" }
    );

    let metadata = &doc.metadata;
    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref language) = metadata.language {
        println!("{}: {}", "Language".bold(), language);
    }
    if let Some(ref date) = metadata.release_date {
        println!("{}: {}", "Release date".bold(), date);
    }
    if let Some(number) = metadata.ebook_number {
        println!("{}: #{}", "EBook".bold(), number);
    }

    println!();
    println!("{}", "Envelope".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let describe = |b: Option<untxt::Boundary>| match b {
        Some(b) => format!("blocks {}..{}", b.start, b.end),
        None => "not found".dimmed().to_string(),
    };
    println!("{}: {}", "Header".bold(), describe(doc.envelope.header));
    println!("{}: {}", "Small print".bold(), describe(doc.envelope.small_print));
    println!("{}: {}", "Footer".bold(), describe(doc.envelope.footer));

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = untxt::render::to_markdown_with_stats(&doc, &RenderOptions::new())?.stats;
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Breaks".bold(), stats.break_count);
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "untxt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Plain-text etext structuring tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/untxt".dimmed());
    println!("License: MIT");
}
