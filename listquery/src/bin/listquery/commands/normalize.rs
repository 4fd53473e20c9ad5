use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Table;
use listquery::{ListQueryRequest, Normalizer};
use serde::Serialize;
use std::path::PathBuf;

use crate::commands::{describe_source, read_input};
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, key_value_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Normalize a request",
        commands: &[
            "listquery normalize request.json            # Show the normalized request as a table",
            "listquery --output json normalize req.json  # Emit the normalized request as JSON",
            "cat req.json | listquery normalize -        # Read the request from stdin",
        ],
    },
    ExampleGroup {
        title: "Strict coercion",
        commands: &["listquery --strict normalize req.json      # Reject flags like \"yes\" or [1]"],
    },
];

#[derive(Args)]
pub struct NormalizeArgs {
    /// Request JSON file (`-` or omitted reads stdin)
    pub input: Option<PathBuf>,
}

/// Normalized request as shown by the CLI.
#[derive(Serialize)]
#[serde(transparent)]
pub struct RequestView(pub ListQueryRequest);

impl TableDisplay for RequestView {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let request = &self.0;
        let filter = request
            .filter()
            .map(ToString::to_string)
            .unwrap_or_else(|| "(none)".to_string());
        let rule_count = request.filter().map_or(0, |filter| filter.rule_count());

        key_value_table(
            options,
            vec![
                ("Page", request.page().to_string()),
                ("Item count", request.page_size().to_string()),
                ("Paginated", request.pagination_enabled().to_string()),
                ("Search enabled", request.search_enabled().to_string()),
                ("Filter", filter),
                ("Rules", rule_count.to_string()),
                ("Order specs", join_specs(request.order_specs())),
                ("Mandatory order specs", join_specs(request.mandatory_order_specs())),
            ],
        )
    }

    fn to_compact(&self) -> String {
        let request = &self.0;
        format!(
            "page={} size={} paginated={} search={} rules={} order={} mandatory={}",
            request.page(),
            request.page_size(),
            request.pagination_enabled(),
            request.search_enabled(),
            request.filter().map_or(0, |filter| filter.rule_count()),
            request.order_specs().len(),
            request.mandatory_order_specs().len(),
        )
    }
}

fn join_specs(specs: &[String]) -> String {
    if specs.is_empty() {
        "(none)".to_string()
    } else {
        specs.join(", ")
    }
}

pub fn handle_normalize(args: NormalizeArgs, normalizer: &Normalizer, output: &OutputManager) -> Result<()> {
    let source = describe_source(args.input.as_ref());
    output.verbose(&format!("Reading request from {source}"));

    let payload = read_input(args.input.as_deref())?;
    let request = normalizer
        .normalize_str(&payload)
        .with_context(|| format!("Failed to normalize request from {source}"))?;

    if request.search_enabled() && request.filter().is_none() {
        output.warning("searchEnabled is set but the request carries no filter rules");
    }

    output.display(&RequestView(request))
}
