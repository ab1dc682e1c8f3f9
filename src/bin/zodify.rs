use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use zodify::base::constants::DEFAULT_TAG;
use zodify::emit::NameStyle;
use zodify::session::{ExtractOptions, extract};

#[derive(Parser)]
#[command(name = "zodify", author, version, about = "Generate zod schemas from tagged TypeScript declarations")]
struct Cli {
    /// Directory path for generated schema files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Comment tag marking entry declarations.
    #[arg(long, default_value = DEFAULT_TAG)]
    tag: String,

    /// Regex matched against input file paths (relative to the working directory).
    #[arg(long)]
    pattern: Option<String>,

    /// tsconfig.json of the project; searched upward from the working directory by default.
    #[arg(long)]
    tsconfig: Option<PathBuf>,

    /// Naming of generated schema constants.
    #[arg(long, value_enum, default_value_t = NameStyle::Keep)]
    name_style: NameStyle,

    /// Log resolution progress to stderr.
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("failed to read the working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = ExtractOptions {
        out_dir: cli.out_dir,
        tag: cli.tag,
        pattern: cli.pattern,
        tsconfig: cli.tsconfig,
        name_style: cli.name_style,
        cwd,
    };

    match extract(&options) {
        Ok(warnings) if warnings.is_empty() => {
            println!("Zod schemas were generated successfully in {}", options.out_dir.display());
            ExitCode::SUCCESS
        }
        Ok(warnings) => {
            println!(
                "Zod schemas were generated successfully in {}. But there are some issues you need to check.\n\n{warnings}",
                options.out_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
