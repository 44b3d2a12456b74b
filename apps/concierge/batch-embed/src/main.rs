use clap::Parser;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_corpus::run_batch;
use domain_embedding::build_provider;
use tracing::info;

mod cli;

use cli::Cli;

fn main() -> eyre::Result<()> {
    install_color_eyre();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&Environment::from_env());

    // Workers block on this runtime's handle from their own threads, so the
    // main thread must stay outside of it while encoding.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let provider = runtime.block_on(build_provider(&cli.embedding_config()))?;
    let model = provider.info();
    info!(model = %model.model_id, dimension = model.dimension, "Creating knowledge base");

    let options = cli.batch_options();
    let artifact = run_batch(
        &cli.input,
        &cli.output,
        provider,
        runtime.handle().clone(),
        &options,
    )?;

    info!(
        passages = artifact.len(),
        dimension = artifact.dimension().unwrap_or(0),
        output = %cli.output.display(),
        "Corpus embedding size: ({}, {})",
        artifact.len(),
        artifact.dimension().unwrap_or(0)
    );
    Ok(())
}
