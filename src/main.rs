use anyhow::Result;
use medianame::cli;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = cli::parse();
    app::run(args)
}
