use anyhow::Context;
use clap::Parser;
use decl::Module;
use decl_config::DeclConfig;

mod cli;
mod output;
mod report;

fn main() {
    if let Err(error) = run() {
        eprintln!("decl error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let mut config = DeclConfig::load().context("failed to load decl configuration")?;
    cli.apply(&mut config);
    init_tracing(cli.log_level(&config))?;

    let module = Module::load(&cli.path, &config.load)
        .with_context(|| format!("failed to load Go package at {}", cli.path.display()))?;
    tracing::debug!(
        package = module.package(),
        diagnostics = module.diagnostics().len(),
        "package loaded"
    );

    let records = report::collect(&module, cli.view, &config.output, cli.directive.as_deref());
    output::output(&records, config.output.format)
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("DECL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
