use miette::Result;
use owo_colors::{OwoColorize, Stream::Stdout};

use super::UnstuffArgs;

pub fn handle(args: &UnstuffArgs) -> Result<()> {
    let stuff = args.open()?;

    for (index, entry) in stuff.entries().iter().enumerate() {
        println!(
            "{:>6} {:>10} {:>10}  {}",
            index.if_supports_color(Stdout, |t| t.dimmed()),
            entry.offset,
            entry.length,
            entry.name.if_supports_color(Stdout, |t| t.green())
        );
    }

    println!(
        "{} entries, {} of {} content bytes referenced",
        stuff.len(),
        stuff
            .content_size()
            .map_or("?".to_string(), |size| size.to_string()),
        stuff.content_length()
    );

    Ok(())
}
