use clap::Parser;
use color_eyre::Result;
use zookeeper_exporter::{
    init_errors,
    init_logging,
    run,
};
use zookeeper_exporter_config::{
    Args,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    let config = Config::new(&args)?;

    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    config.validate()?;
    init_logging(config.output_format)?;
    run(config).await
}
