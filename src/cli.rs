use crate::comments::{extract_blocks, DirectiveIndex};
use crate::config::{AppOutputFormat, FieldCase, GeneratorConfig, OutputFormat};
use crate::directive::DirectiveKind;
use crate::error::Error;
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument};
use crate::parser::{AstParser, SourceFile};
use crate::references::check_references;
use crate::scanner::FileScanner;
use crate::serializer::{serialize, write_to_file};
use crate::type_resolver::TypeResolver;
use crate::warnings::Warnings;
use anyhow::Result;
use clap::Parser;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Generate an OpenAPI document from go-swagify directive comments in Rust sources
#[derive(Parser, Debug)]
#[command(name = "swagify")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the project directory (defaults to the current directory)
    #[arg(value_name = "PROJECT_PATH", default_value = ".")]
    pub project_path: PathBuf,

    /// Output file path (defaults to <PROJECT_PATH>/swagger.<format>)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Media type of request and response bodies declared without one
    #[arg(long = "app-output-format", value_enum, default_value = "json")]
    pub app_output_format: AppOutputFormat,

    /// Naming convention for schema properties derived from struct fields
    #[arg(long = "alt-field-format", value_enum, default_value = "snakeCase")]
    pub alt_field_format: FieldCase,

    /// Fail when a reference has no target in components
    #[arg(long = "strict-refs")]
    pub strict_refs: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            app_output_format: self.app_output_format,
            alt_field_format: self.alt_field_format,
            strict_references: self.strict_refs,
        }
    }

    /// The `-o` path, or `swagger.<ext>` inside the project directory.
    pub fn resolved_output_path(&self) -> PathBuf {
        self.output_path.clone().unwrap_or_else(|| {
            self.project_path
                .join(format!("swagger.{}", self.output_format.extension()))
        })
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        return Err(Error::InvalidArgument(format!(
            "Project path does not exist: {}",
            args.project_path.display()
        ))
        .into());
    }

    if !args.project_path.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "Project path is not a directory: {}",
            args.project_path.display()
        ))
        .into());
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    info!("Output file: {}", args.resolved_output_path().display());
    info!("Application media type: {}", args.app_output_format.media_type());
    info!("Field naming: {:?}", args.alt_field_format);
    if args.strict_refs {
        info!("Strict reference checking enabled");
    }

    Ok(args)
}

/// Counts reported in the final summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub files_scanned: usize,
    pub files_parsed: usize,
    pub directives: usize,
    pub structs: usize,
}

/// Everything produced from a project directory before serialization.
#[derive(Debug)]
pub struct Generation {
    pub document: OpenApiDocument,
    pub warnings: Warnings,
    pub stats: GenerationStats,
}

/// Scans `project_path` and assembles the document.
///
/// Only I/O failures are errors; everything else ends up in [`Generation::warnings`].
pub fn generate(project_path: &Path, config: GeneratorConfig) -> Result<Generation> {
    let mut warnings = Warnings::new();

    // Step 1: Scan directory for Rust files
    info!("Scanning project directory...");
    let scan_result = FileScanner::new(project_path.to_path_buf()).scan()?;
    info!("Found {} Rust files", scan_result.rust_files.len());
    for warning in scan_result.warnings {
        warnings.add(warning);
    }
    if scan_result.rust_files.is_empty() {
        warn!("No Rust files found in {}", project_path.display());
    }

    // Step 2: Read sources
    let sources = scan_result
        .rust_files
        .iter()
        .map(|path| SourceFile::read(path))
        .collect::<Result<Vec<_>>>()?;

    // Step 3: Extract directive comments
    info!("Extracting directives...");
    let mut index = DirectiveIndex::new();
    for source in &sources {
        let blocks = extract_blocks(&source.source, &source.path, &mut warnings);
        debug!("{} directives in {}", blocks.len(), source.path.display());
        index.extend(blocks, &mut warnings);
    }
    info!("Found {} directives", index.len());

    // Step 4: Parse sources and describe the structs named by @@struct
    info!("Parsing Rust files...");
    let parsed_files = AstParser::parse_all(&sources, &mut warnings);
    info!("Successfully parsed {} files", parsed_files.len());
    let resolver = TypeResolver::new(&parsed_files);
    let structs = resolver.select(index.identifiers(DirectiveKind::Struct), &mut warnings);

    // Step 5: Build document
    info!("Building OpenAPI document...");
    let document = OpenApiBuilder::new(config).build(&index, &structs, &mut warnings);

    Ok(Generation {
        document,
        warnings,
        stats: GenerationStats {
            files_scanned: sources.len(),
            files_parsed: parsed_files.len(),
            directives: index.len(),
            structs: structs.len(),
        },
    })
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");
    let config = args.generator_config();

    let Generation {
        document,
        warnings,
        stats,
    } = generate(&args.project_path, config)?;

    if config.strict_references {
        info!("Checking references...");
        if let Err(err) = check_references(&document) {
            warnings.flush();
            return Err(err.into());
        }
    }

    // Step 6: Serialize and write
    info!("Serializing to {:?} format...", args.output_format);
    let content = serialize(&document, args.output_format)?;
    let output_path = args.resolved_output_path();
    info!("Writing output to: {}", output_path.display());
    write_to_file(&content, &output_path)?;

    warnings.flush();

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", stats.files_scanned);
    info!("  - Files parsed: {}", stats.files_parsed);
    info!("  - Directives found: {}", stats.directives);
    info!("  - Structs described: {}", stats.structs);
    info!("  - Paths emitted: {}", document.paths.len());
    info!("  - Warnings: {}", warnings.len());

    Ok(())
}
