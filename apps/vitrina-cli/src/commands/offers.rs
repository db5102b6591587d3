//! `vitrina offers`: show what the feed normalizes to.
//!
//! Unlike `price`, a transport failure here is an error: the point of the
//! command is to inspect the feed.

use clap::Args;
use vitrina_offers::fetch_offers;

use super::{OffersArgs, Output};
use crate::config::AppConfig;
use crate::error::CliResult;
use crate::render;

#[derive(Debug, Args)]
pub struct OffersCommandArgs {
    #[command(flatten)]
    pub offers: OffersArgs,
}

pub async fn execute(args: OffersCommandArgs, config: &AppConfig, output: Output) -> CliResult<String> {
    let source = args.offers.apply(&config.offers).build_source()?;
    let normalized = fetch_offers(source.as_ref()).await?;

    match output {
        Output::Json => Ok(serde_json::to_string_pretty(&normalized)?),
        Output::Table => Ok(render::offers_table(&normalized)),
    }
}
