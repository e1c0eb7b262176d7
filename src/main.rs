mod actions;
mod app;
mod cli;
mod component;
mod config;
mod page;
mod tui;
mod utils;
mod watermark;

use app::{App, RootState};
use clap::Parser;
use color_eyre::eyre::{Context, Result};
use dotenv::dotenv;
use page::form::FormPage;

#[cfg(not(tarpaulin_include))]
async fn run() -> Result<()> {
    use cli::{ClapSource, Commands};

    let args = cli::Cli::parse();
    let config = config::Config::new(Some(ClapSource::new(&args)))
        .context("Error when loading config")?;

    if let Some(Commands::PrintConfig) = &args.command {
        print!("{}", cli::print_config(&config)?);
        return Ok(());
    }

    utils::logging::init(&config.config.data_dir).context("Error when setting up logging")?;
    trace_dbg!(level: tracing::Level::INFO, &config.config.data_dir);

    let page = FormPage::new(&config.form).context("Error when building the form")?;
    let state = RootState::new(config);
    let mut app = App::new(
        Box::new(page),
        state,
        tui::Tui::new()?
            .tick_rate(args.tick_rate)
            .frame_rate(args.frame_rate)
            .mouse(true)
            .paste(true)
            .focus(true)
            .into(),
    );

    if let Some(submission) = app.run().await? {
        println!("{}", serde_json::to_string_pretty(&submission)?);
    }
    Ok(())
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<()> {
    dotenv().ok();
    utils::errors::init()?;

    run().await
}
