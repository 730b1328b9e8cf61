//! Dist command: publish one release artifact

use anyhow::Result;
use relpub_core::HttpRegistry;

use crate::config::{DistArgs, DistConfig};
use crate::ui::Output;

/// Publish the artifact described by `args`.
///
/// With `dry_run` the descriptor is built (checksum and signature
/// included) and printed as JSON; the registry is never contacted.
pub async fn dist(args: DistArgs, dry_run: bool, output: &Output) -> Result<()> {
    let config = DistConfig::from_args(args)?;

    if dry_run {
        let (_, descriptor) = relpub_core::prepare(&config.request, output)?;
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    tracing::debug!("Publishing to {}", config.api_url);
    let registry = HttpRegistry::new(&config.api_url, &config.account, &config.token)?;

    let release = relpub_core::publish(&config.request, &registry, output, |descriptor| {
        output.progress(descriptor.filesize)
    })
    .await?;

    output.published(&release.id);
    Ok(())
}
