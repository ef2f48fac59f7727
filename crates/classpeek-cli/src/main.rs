//! classpeek - Inspect the declared members and annotations of class files
//!
//! This tool decodes compiled JVM class files without loading them and
//! reports the declared class, its annotations and its annotated members.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, ValueEnum};
use classpeek_core::{
    ArchiveSource, ClassSource, DecodedContainer, Decoder, DecoderConfig, DirectorySource,
    MemberRef, DEFAULT_MAX_MAJOR_VERSION,
};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Inspect the declared members and annotations of class files
#[derive(Parser, Debug)]
#[command(name = "classpeek")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Reject class files with a newer major version
    #[arg(long, env = "CLASSPEEK_MAX_MAJOR_VERSION", default_value_t = DEFAULT_MAX_MAJOR_VERSION)]
    max_major_version: u16,

    /// Let Long and Double constants occupy two pool slots
    #[arg(long)]
    reserve_wide_slots: bool,

    /// Only report classes that carry at least one annotation
    #[arg(long)]
    annotated_only: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single .class file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory of .class files laid out by package
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Path to a jar or zip file of .class entries laid out by package
    #[arg(short, long)]
    archive: Option<PathBuf>,
}

/// Output format for decoded classes
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Class name, class annotations and annotated members
    Summary,
    /// Just the class name (for scripting)
    Name,
}

impl Cli {
    fn decoder(&self) -> Decoder {
        let config = DecoderConfig::new()
            .max_major_version(self.max_major_version)
            .reserve_wide_slots(self.reserve_wide_slots);
        Decoder::with_config(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    // Dispatch based on input mode
    if let Some(ref file) = cli.input.file {
        process_single_file(&cli, file)
    } else if let Some(ref directory) = cli.input.directory {
        process_directory(&cli, directory)
    } else if let Some(ref archive) = cli.input.archive {
        process_archive(&cli, archive)
    } else {
        bail!("One of --file, --directory or --archive must be specified")
    }
}

/// Decode and report a single class file
fn process_single_file(cli: &Cli, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("Input file does not exist: {}", file.display());
    }
    if !file.is_file() {
        bail!("Input path is not a file: {}", file.display());
    }

    let container = cli
        .decoder()
        .decode_file(file)
        .with_context(|| format!("Failed to decode class file: {}", file.display()))?;

    if let Some(report) = render(cli, &container)? {
        print!("{}", report);
    }
    Ok(())
}

/// Decode and report every class under a directory
fn process_directory(cli: &Cli, directory: &Path) -> Result<()> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let source = DirectorySource::with_decoder(directory, cli.decoder())
        .with_context(|| format!("Failed to open class directory: {}", directory.display()))?;
    process_source(cli, &source, directory)
}

/// Decode and report every class entry in a jar or zip file
fn process_archive(cli: &Cli, archive: &Path) -> Result<()> {
    if !archive.exists() {
        bail!("Archive does not exist: {}", archive.display());
    }
    if !archive.is_file() {
        bail!("Archive path is not a file: {}", archive.display());
    }

    info!("Scanning archive: {}", archive.display());

    let source = ArchiveSource::with_decoder(archive, cli.decoder())
        .with_context(|| format!("Failed to open class archive: {}", archive.display()))?;
    process_source(cli, &source, archive)
}

/// Decode and report every class a source lists, skipping ones that fail
fn process_source(cli: &Cli, source: &impl ClassSource, origin: &Path) -> Result<()> {
    let names = source
        .list(true)
        .with_context(|| format!("Failed to list classes under: {}", origin.display()))?;

    let mut classes_decoded = 0;
    for name in &names {
        debug!("Decoding class: {}", name);
        match source.read(name) {
            Ok(container) => {
                classes_decoded += 1;
                if let Some(report) = render(cli, &container)? {
                    print!("{}", report);
                }
            }
            // Log error but continue with other classes
            Err(e) => warn!("Error processing {}: {}", name, e),
        }
    }

    info!("Decoded {} of {} classes", classes_decoded, names.len());
    Ok(())
}

/// Formats one container, or `None` if it is filtered out
fn render(cli: &Cli, container: &DecodedContainer) -> Result<Option<String>> {
    if cli.annotated_only && !container.has_annotations() {
        return Ok(None);
    }

    let mut out = String::new();
    match cli.format {
        OutputFormat::Name => writeln!(out, "{}", container.name())?,
        OutputFormat::Summary => summary(&mut out, container)?,
    }
    Ok(Some(out))
}

fn summary(out: &mut impl fmt::Write, container: &DecodedContainer) -> fmt::Result {
    writeln!(out, "{}", container.name())?;

    for annotation in container.annotations() {
        writeln!(out, "  @{}", annotation.name())?;
    }

    for (member, annotations) in container.annotated_members() {
        if annotations.is_empty() {
            continue;
        }
        writeln!(out, "  {}", signature(member))?;
        for annotation in annotations {
            writeln!(out, "    @{}", annotation.name())?;
        }
    }
    Ok(())
}

/// Source-like rendering of a member, e.g. `void resize(int, int)`
fn signature(member: &MemberRef) -> String {
    if let Some(ty) = member.field_type() {
        return format!("{} {}", ty.simple_name(), member.name().as_str_lossy());
    }

    let parameters: Vec<String> = member
        .parameter_types()
        .iter()
        .map(|p| p.simple_name())
        .collect();
    let return_type = member
        .return_type()
        .map(|r| r.simple_name())
        .unwrap_or_default();

    if member.is_constructor() {
        format!("{}({})", member.declaring_type().simple_name(), parameters.join(", "))
    } else {
        format!(
            "{} {}({})",
            return_type,
            member.name().as_str_lossy(),
            parameters.join(", ")
        )
    }
}
