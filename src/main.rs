use appscope::boundary::DynamicClasses;
use appscope::config::{split_list, Configuration, Settings};
use appscope::entry::EntryPointHandle;
use appscope::{AndroidSetup, AppScopeError, PlatformDirInspector, RunMode};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// appscope - application/library boundary for whole-program analysis
#[derive(Parser, Debug)]
#[command(name = "appscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application packages or classes, separated by the path separator
    /// (`com.app.*`, `com.app.**`, `**`, or a class name)
    #[arg(short = 'r', long, value_name = "regex")]
    application_regex: Option<String>,

    /// The main class that runs the application when the program executes
    #[arg(short, long, value_name = "class")]
    main_class: Option<String>,

    /// Application JAR files (or a single APK), separated by the path separator
    #[arg(short = 'a', long, value_name = "path")]
    application_jars: Option<String>,

    /// Library JAR files, separated by the path separator
    #[arg(short, long, value_name = "path")]
    library_jars: Option<String>,

    /// File listing classes that are loaded dynamically, one per line
    #[arg(short, long, value_name = "file")]
    dynamic_classes_file: Option<PathBuf>,

    /// Reflection facts for this application in the TamiFlex format
    #[arg(short, long, value_name = "file")]
    tamiflex_facts_file: Option<PathBuf>,

    /// Directory for output files
    #[arg(short, long, value_name = "directory")]
    output_directory: Option<PathBuf>,

    /// Java runtime environment to model (required for JAR input)
    #[arg(short = 'j', long, value_name = "directory")]
    java_runtime_directory: Option<PathBuf>,

    /// Android platforms directory containing android-N/android.jar (required for APK input)
    #[arg(short = 'p', long, value_name = "directory")]
    android_platform_directory: Option<PathBuf>,

    /// Settings file (YAML or TOML); command-line values take precedence
    #[arg(short, long, value_name = "file")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        let list = |value: &Option<String>| value.as_deref().map(split_list).unwrap_or_default();
        let paths = |value: &Option<String>| -> Vec<PathBuf> {
            list(value).into_iter().map(PathBuf::from).collect()
        };

        Settings {
            application_regex: list(&self.application_regex),
            main_class: self.main_class.clone(),
            application_jars: paths(&self.application_jars),
            library_jars: paths(&self.library_jars),
            dynamic_classes_file: self.dynamic_classes_file.clone(),
            tamiflex_facts_file: self.tamiflex_facts_file.clone(),
            output_directory: self.output_directory.clone(),
            java_runtime_directory: self.java_runtime_directory.clone(),
            android_platform_directory: self.android_platform_directory.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e);
            usage_and_exit();
        }
    };

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("appscope v{}", env!("CARGO_PKG_VERSION"));

    let settings = load_settings(&cli)?;

    // Configuration errors end the run with usage text and exit status 0
    let config = match Configuration::from_settings(settings) {
        Err(e) if e.is_configuration() => {
            eprintln!("{}: {}", "error".red().bold(), e);
            usage_and_exit();
        }
        result => result.into_diagnostic()?,
    };

    run(&config)
}

fn usage_and_exit() -> ! {
    if let Err(e) = Cli::command().print_help() {
        debug!("Failed to print usage: {}", e);
    }
    println!();
    std::process::exit(0);
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let file_settings = if let Some(path) = &cli.config {
        Settings::from_file(path)?
    } else {
        let cwd = std::env::current_dir().into_diagnostic()?;
        Settings::from_default_locations(&cwd)?
    };

    // Override with CLI arguments
    Ok(file_settings.merge(cli.settings()))
}

fn run(config: &Configuration) -> Result<()> {
    let stats = config.classifier().rules().stats();

    println!("{} {}", "Mode:".bold(), config.mode().to_string().cyan());
    println!("{} {}", "Application patterns:".bold(), stats);
    for artifact in config.application_artifacts() {
        println!("  {} {}", "app".green(), artifact.display());
    }
    for artifact in config.library_artifacts() {
        println!("  {} {}", "lib".yellow(), artifact.display());
    }
    println!("{} {}", "Output directory:".bold(), config.output_directory().display());

    let dynamic = DynamicClasses::load(config.dynamic_classes_file()).into_diagnostic()?;
    if config.is_dynamic_classes_enabled() {
        let app = dynamic.application_classes(config.classifier());
        let lib = dynamic.library_classes(config.classifier());
        println!(
            "{} {} ({} application, {} library)",
            "Dynamic classes:".bold(),
            dynamic.len(),
            app.len(),
            lib.len()
        );
        for name in &app {
            debug!("dynamic application class {}", name);
        }
    }

    if let Some(facts) = config.tamiflex_facts_file() {
        println!("{} {}", "TamiFlex facts:".bold(), facts.display());
    }

    match config.mode() {
        RunMode::Java => {
            if let Some(main_class) = config.main_class() {
                let side = if config.is_application_class(main_class) {
                    "application".green()
                } else {
                    "library".yellow()
                };
                println!("{} {} ({})", "Main class:".bold(), main_class, side);
            }
            if let Some(jre) = config.runtime_directory() {
                println!("{} {}", "Java runtime:".bold(), jre.display());
            }
        }
        RunMode::Android => run_android_census(config)?,
    }

    Ok(())
}

fn run_android_census(config: &Configuration) -> Result<()> {
    let setup =
        AndroidSetup::new(config, &PlatformDirInspector, no_entry_synthesizer).into_diagnostic()?;
    println!("{} {}", "Android API level:".bold(), setup.api_level());

    let apk = setup.apk_path().display().to_string();
    let classes = setup
        .referenced_application_class_count()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to index {}", apk))?;
    let methods = setup
        .referenced_application_method_count()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to index {}", apk))?;

    println!(
        "{} {} classes, {} methods",
        "Application references:".bold(),
        classes,
        methods
    );

    Ok(())
}

/// The CLI only reports the census; building the dummy main needs a
/// synthesizer supplied by the analysis that embeds this crate.
fn no_entry_synthesizer(
    _platform_dir: &Path,
    artifact: &Path,
) -> appscope::Result<EntryPointHandle> {
    Err(AppScopeError::EntrySynthesis(format!(
        "no entry-point synthesizer available for {}",
        artifact.display()
    )))
}
