use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use delve_service::{DelveService, QueryPlan, SearchTool};

#[derive(Debug, Parser)]
#[command(
	version = delve_cli::VERSION,
	rename_all = "kebab",
	styles = delve_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// The research question to answer.
	pub query: String,
	/// Search tool to dispatch to, `semantic` or `keyword`.
	#[arg(long, default_value = "semantic")]
	pub tool: String,
	/// Maximum search hits to fetch; defaults to `research.default_limit`.
	#[arg(long)]
	pub limit: Option<u32>,
	/// Aspect id to tag extracted facts with.
	#[arg(long)]
	pub aspect: Option<String>,
	/// Summarizer model override.
	#[arg(long)]
	pub model: Option<String>,
	/// Only search conversations created after this RFC 3339 timestamp.
	#[arg(long, value_name = "TIMESTAMP")]
	pub created_after: Option<String>,
	/// Maximum ranked facts to report; defaults to `ranking.top_k`.
	#[arg(long)]
	pub top_k: Option<u32>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let mut config = delve_config::load(&args.config)?;

	init_tracing(&config)?;

	if let Some(top_k) = args.top_k {
		config.ranking.top_k = top_k;
	}

	let service = DelveService::new(config);
	let plan = QueryPlan {
		tool: SearchTool::parse(&args.tool),
		query: args.query,
		limit: args.limit,
		aspect_id: args.aspect,
		model: args.model,
		created_after: args.created_after,
	};
	let outcome = service.research(&plan).await;
	let ranked = service.rank_facts(&outcome.facts, &plan.query);
	let report = serde_json::json!({
		"status": outcome.status,
		"raw_results": outcome.raw_results.len(),
		"summaries": outcome.summaries.len(),
		"facts": ranked,
	});

	println!("{}", serde_json::to_string_pretty(&report)?);

	Ok(())
}

fn init_tracing(config: &delve_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.agent.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
