//! CLI runner - resolves inputs and drives a copy

use super::commands::Cli;
use super::input::{confirm_total, parse_api_key, parse_booru_host, resolve, resolve_query};
use super::progress::ConsoleSink;
use crate::config::CopierConfig;
use crate::engine::Copier;
use crate::error::Result;
use crate::http::Booru;
use tracing::info;

/// Everything needed to start a copy
#[derive(Debug)]
struct Connection {
    source: Booru,
    target: Booru,
    query: String,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the copy
    pub async fn run(&self) -> Result<()> {
        println!("Philomena Copier v{}", crate::VERSION);
        println!();
        println!(
            "Ensure your filters are set correctly on the source booru. \
             The active filter will be used when copying images."
        );
        println!("API keys can be found on the Account page.");
        println!();

        let config = self.load_config()?;
        let connection = self.resolve_connection()?;
        info!(
            source = connection.source.host(),
            target = connection.target.host(),
            "Starting copy"
        );

        let mut copier = Copier::new(
            &config,
            connection.source,
            connection.target,
            connection.query,
        )?;
        let mut sink = ConsoleSink::stdout(self.cli.verbose);

        let first = copier.preview(&mut sink).await?;
        if first.total == 0 {
            return Ok(());
        }

        if !self.cli.yes && !confirm_total(first.total)? {
            println!("Aborted, nothing was copied.");
            return Ok(());
        }

        copier.run_from(first, &mut sink).await?;
        Ok(())
    }

    /// Load the tuning file, or defaults
    fn load_config(&self) -> Result<CopierConfig> {
        match &self.cli.config {
            Some(path) => CopierConfig::load(path),
            None => Ok(CopierConfig::default()),
        }
    }

    /// Take connection values from flags/env, prompting for the rest
    fn resolve_connection(&self) -> Result<Connection> {
        let cli = &self.cli;

        let source_host = resolve(
            cli.source.as_deref(),
            "Enter source booru url",
            parse_booru_host,
        )?;
        let source_key = resolve(
            cli.source_key.as_deref(),
            "Enter source booru API Key",
            parse_api_key,
        )?;
        let target_host = resolve(
            cli.target.as_deref(),
            "Enter target booru url",
            parse_booru_host,
        )?;
        let target_key = resolve(
            cli.target_key.as_deref(),
            "Enter target booru API Key",
            parse_api_key,
        )?;
        let query = resolve_query(cli.query.as_deref())?;

        Ok(Connection {
            source: Booru::new(&source_host, source_key)?,
            target: Booru::new(&target_host, target_key)?,
            query,
        })
    }
}
