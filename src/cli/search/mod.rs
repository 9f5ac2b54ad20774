//! Search command - runs one request through the pipeline

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use super::parse_wire_value;
use crate::domain::retrieval::{
    RetrievalResult, RetrievalRoute, SearchField, SearchFilters, SearchQueries, SearchRequest,
};

/// Arguments for the search command
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Search terms for a single-clause request
    #[arg(required_unless_present = "request")]
    pub query: Option<String>,

    /// Field the query is matched against
    #[arg(long, default_value = "total", value_parser = parse_wire_value::<SearchField>)]
    pub field: SearchField,

    /// Source to search; repeat for several (defaults to every configured source)
    #[arg(long = "route", value_parser = parse_wire_value::<RetrievalRoute>)]
    pub routes: Vec<RetrievalRoute>,

    /// The user's original question (defaults to the query)
    #[arg(long)]
    pub question: Option<String>,

    /// Per-source result cap
    #[arg(long, default_value_t = 10)]
    pub top_k: u32,

    /// Earliest publication year
    #[arg(long, requires = "to_year")]
    pub from_year: Option<i32>,

    /// Latest publication year
    #[arg(long, requires = "from_year")]
    pub to_year: Option<i32>,

    /// Read the full request from a JSON file instead
    #[arg(long, conflicts_with = "query")]
    pub request: Option<PathBuf>,

    /// Print the whole result envelope as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    /// Build the request; `default_routes` apply when no route flag is given
    pub fn to_request(&self, default_routes: &[RetrievalRoute]) -> anyhow::Result<SearchRequest> {
        if let Some(path) = &self.request {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request file {}", path.display()))?;
            return serde_json::from_str(&body)
                .with_context(|| format!("Invalid search request in {}", path.display()));
        }

        let query = self
            .query
            .clone()
            .context("A query or a request file is required")?;
        let routes = if self.routes.is_empty() {
            default_routes.to_vec()
        } else {
            self.routes.clone()
        };
        let question = self.question.clone().unwrap_or_else(|| query.clone());

        let mut filters = SearchFilters::default();
        if let (Some(from_year), Some(to_year)) = (self.from_year, self.to_year) {
            filters = filters.with_year_range(from_year, to_year);
        }

        Ok(SearchRequest::new(
            SearchQueries::new(query).with_field(self.field),
            routes,
            question,
        )
        .with_filters(filters)
        .with_top_k(self.top_k))
    }
}

/// Run the search command
pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let request = args.to_request(&config.sources.configured_routes())?;
    let executor = crate::build_executor(&config).await?;
    let result = executor.execute(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result));
    }

    Ok(())
}

fn render(result: &RetrievalResult) -> String {
    let metadata = &result.metadata;
    let mut output = String::new();

    for document in &result.documents {
        let source = document.source.map(|s| s.as_str()).unwrap_or("unknown");
        let headline = document.content.lines().next().unwrap_or_default();
        output.push_str(&format!(
            "{:>3}. [{}] {:.3}  {}\n",
            document.rank, source, document.fused_score, headline
        ));
    }

    for failure in &metadata.failed_sources {
        output.push_str(&format!("failed: {} ({})\n", failure.source, failure.reason));
    }

    output.push_str(&format!(
        "retrieved {}, deduplicated {}, reranked {}, kept {} in {} ms\n",
        metadata.total_retrieved,
        metadata.after_dedup,
        metadata.after_rerank,
        metadata.after_crag,
        metadata.elapsed_ms
    ));

    if result.needs_web_search {
        output.push_str("web search recommended\n");
    }

    output
}
