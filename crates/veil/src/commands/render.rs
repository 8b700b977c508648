//! `veil render` command implementation.

use std::path::PathBuf;

use clap::Args;
use veil_gate::{Page, scan};

use super::{ConfigArgs, page_renderer};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Page JSON exported from the content store.
    page: PathBuf,

    /// Treat the environment as ready: gates render locked or revealed
    /// instead of as loading placeholders.
    #[arg(long)]
    ready: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the page cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.config.load()?;
        let page = Page::load(&self.page)?;
        let gated = scan(&page);

        let html = page_renderer(&config, &gated, self.ready)?
            .with_environment_ready(self.ready)
            .render(&page);

        output.result(&html)?;
        output.info(&format!(
            "Rendered {} ({} gated block{})",
            self.page.display(),
            gated.len(),
            if gated.len() == 1 { "" } else { "s" }
        ));
        Ok(())
    }
}
