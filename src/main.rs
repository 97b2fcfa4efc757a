use clap::Parser;

use calma_wrangle::config::{Cli, Command, WrangleConfig};
use calma_wrangle::core::explore;
use calma_wrangle::domain::ports::ConfigProvider;
use calma_wrangle::utils::validation::{self, Validate};
use calma_wrangle::utils::logger;
use calma_wrangle::{
    AnalysisPipeline, ExportMode, LocalStorage, RdfClient, Result, TrackPipeline, WrangleEngine,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting calma-wrangle");

    let config = match WrangleConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Err(e) = config.validate() {
        fail(&e);
    }
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!("Command failed: {}", e);
        fail(&e);
    }
}

fn fail(e: &calma_wrangle::WrangleError) -> ! {
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn run(cli: &Cli, config: &WrangleConfig) -> Result<()> {
    let client = RdfClient::new(config.timeout(), config.user_agent())?;

    match &cli.command {
        Command::Explore { url } => {
            validation::validate_url("url", url)?;
            println!("CALMA analysis URL {}", url);
            let graph = client.fetch_graph(url).await?;
            println!("Read RDF at {} ({} triples)", url, graph.len());
            for entry in explore::outline(&graph) {
                print!("{}", entry);
            }
            Ok(())
        }
        Command::ExportMetadata { url } => {
            export_analysis(cli, config, client, url, ExportMode::Metadata).await
        }
        Command::ExportSubjects { url } => {
            export_analysis(cli, config, client, url, ExportMode::Subjects).await
        }
        Command::ExportAnalysis { url } => {
            export_analysis(cli, config, client, url, ExportMode::All).await
        }
        Command::ExportMultiple { url } => {
            validation::validate_url("url", url)?;
            println!("CALMA track URL {}", url);
            let storage = LocalStorage::new(config.collection_dir.clone());
            let pipeline = TrackPipeline::new(storage, config.clone(), client, url.clone());
            let engine = WrangleEngine::new_with_monitoring(pipeline, cli.monitor);
            let output = engine.run().await?;
            println!("✅ Export complete");
            println!("📁 Collection data written to {}", output);
            Ok(())
        }
    }
}

async fn export_analysis(
    cli: &Cli,
    config: &WrangleConfig,
    client: RdfClient,
    url: &str,
    mode: ExportMode,
) -> Result<()> {
    validation::validate_url("url", url)?;
    println!("CALMA analysis URL {}", url);

    let storage = LocalStorage::new(config.collection_dir.clone());
    let pipeline = AnalysisPipeline::new(storage, config.clone(), client, url.to_string(), mode);
    let engine = WrangleEngine::new_with_monitoring(pipeline, cli.monitor);

    let output = engine.run().await?;
    println!("✅ Export complete");
    println!("📁 Collection data written to {}", output);
    Ok(())
}
