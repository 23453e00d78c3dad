use bw2_stuff::ExtractOptions;
use miette::{Context, Result};
use tracing::info;

use super::UnstuffArgs;

pub fn handle(args: &UnstuffArgs) -> Result<()> {
    let directory = args.output_directory()?;
    let mut stuff = args.open()?;

    info!("content length: {} bytes", stuff.content_length());
    info!("{} file dictionary entries", stuff.len());
    info!("extracting files to {}", directory.display());

    let options = ExtractOptions::builder()
        .overwrite(!args.keep_existing)
        .build();

    let count = stuff
        .extract(&directory, &options)
        .context(format!("extracting {}", args.file.display()))?;

    info!("done, {count} files written");
    Ok(())
}
