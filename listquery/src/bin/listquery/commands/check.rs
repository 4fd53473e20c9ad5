use anyhow::Result;
use clap::Args;
use listquery::Normalizer;
use std::path::PathBuf;

use crate::commands::{describe_source, read_input};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Validate a request",
    commands: &[
        "listquery check request.json               # Exit non-zero if the request is malformed",
        "listquery --quiet check request.json       # Only print errors",
    ],
}];

#[derive(Args)]
pub struct CheckArgs {
    /// Request JSON file (`-` or omitted reads stdin)
    pub input: Option<PathBuf>,
}

pub fn handle_check(args: CheckArgs, normalizer: &Normalizer, output: &OutputManager) -> Result<()> {
    let source = describe_source(args.input.as_ref());
    let payload = read_input(args.input.as_deref())?;

    match normalizer.normalize_str(&payload) {
        Ok(request) => {
            let summary = match request.filter() {
                Some(filter) => format!("{} rules, {} levels", filter.rule_count(), filter.depth()),
                None => "no filter".to_string(),
            };
            output.success(&format!("{source}: request is valid ({summary})"));
            Ok(())
        }
        Err(err) => {
            output.error(&format!("{source}: {err}"));
            anyhow::bail!("request from {source} is invalid")
        }
    }
}
