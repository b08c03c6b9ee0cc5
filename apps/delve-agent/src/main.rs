use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = delve_agent::Args::parse();

	delve_agent::run(args).await
}
