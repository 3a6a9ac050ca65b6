use clap::Parser;
use odftext::{Cli, OdfText, OdfTextError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    setup_logging();
    let exit_code = run(Cli::parse());
    process::exit(exit_code);
}

fn run(cli: Cli) -> i32 {
    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match OdfText::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&app);
    }

    match app.convert_directory() {
        Ok(report) => report.exit_code(),
        Err(e) => {
            app.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "odftext.toml".to_string());

    match OdfText::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  odftext --config {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(app: &OdfText) -> i32 {
    let formatter = app.output_formatter();
    let config = app.config();

    println!("DRY RUN MODE - No files will be written");
    println!("  Input directory:  {}", config.batch.input_dir.display());
    println!("  Output directory: {}", config.batch.output_dir.display());
    println!("  Overwrite:        {}", config.batch.overwrite);
    formatter.print_separator();

    let plan = match app.plan() {
        Ok(plan) => plan,
        Err(e) => {
            app.handle_error(&e);
            return 1;
        }
    };

    if plan.is_empty() {
        println!("No .odt/.ods files found");
        return 0;
    }

    for (document, target, skip) in &plan {
        let action = if *skip { "skip" } else { "convert" };
        println!(
            "  {:<8} {} -> {} ({})",
            action,
            document.filename,
            target.display(),
            document.kind
        );
    }

    let skipped = plan.iter().filter(|(_, _, skip)| *skip).count();
    formatter.print_separator();
    println!(
        "Would convert {} and skip {} of {} files",
        plan.len() - skipped,
        skipped,
        plan.len()
    );

    0
}

fn print_startup_error(error: &OdfTextError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging() {
    let env = env_logger::Env::default().default_filter_or("odftext=warn");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}
