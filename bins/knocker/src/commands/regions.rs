//! Region catalogue

use super::emit;
use crate::context::Context;
use anyhow::Result;
use knocker_api_client::format::{region_flag_emoji, PLACEHOLDER};
use knocker_cli::Table;

pub async fn run(ctx: &Context) -> Result<()> {
    ctx.authenticate("/").await?;
    let regions = ctx.spin("Fetching regions", ctx.client.regions().list()).await?;

    emit(ctx, &regions, |regions| {
        let mut table = Table::new(["ID", "NAME", "REGION", ""]);
        for region in regions {
            table.row([
                region.id.clone(),
                region.name.clone(),
                region.display_name.clone(),
                region_flag_emoji(&region.name).unwrap_or_else(|| PLACEHOLDER.to_string()),
            ]);
        }
        table.print();
    })
}
