//! `veil unlock` command implementation.

use std::path::PathBuf;

use clap::Args;
use veil_gate::{Page, RevealController, RevealPhase, scan};

use super::{ConfigArgs, page_renderer};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the unlock command.
#[derive(Args)]
pub(crate) struct UnlockArgs {
    /// Page JSON exported from the content store.
    page: PathBuf,

    /// Id of the gated block.
    #[arg(short, long)]
    block: String,

    /// Credential to try.
    #[arg(long, env = "VEIL_CREDENTIAL", hide_env_values = true)]
    credential: String,

    #[command(flatten)]
    config: ConfigArgs,
}

impl UnlockArgs {
    /// Execute the unlock command.
    ///
    /// Prints the payload on success. A successful unlock is remembered in the
    /// session memo, so later `render --ready` runs show the block revealed.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is missing or not gated, or if the
    /// credential does not match.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.config.load()?;
        let page = Page::load(&self.page)?;

        if page.find_block(&self.block).is_none() {
            return Err(CliError::Validation(format!(
                "block {} not found in {}",
                self.block,
                self.page.display()
            )));
        }
        let target = scan(&page)
            .into_iter()
            .find(|g| g.id == self.block)
            .ok_or_else(|| CliError::Validation(format!("block {} is not gated", self.block)))?;

        let renderer = page_renderer(&config, std::slice::from_ref(&target), true)?;
        let controller = renderer.controller(target.gate.clone());
        let payload = attempt(controller, &self.credential)?;

        output.result(&payload)?;
        output.success(&format!("Unlocked {} block {}", target.block_type, target.id));
        Ok(())
    }
}

/// Run one reveal attempt and return the payload on success.
fn attempt(mut controller: RevealController, credential: &str) -> Result<String, CliError> {
    if controller.environment_ready() == RevealPhase::Revealed {
        tracing::info!("block already revealed in this session");
        return Ok(controller.gate().payload.clone());
    }

    controller.set_attempt(credential);
    match controller.submit() {
        RevealPhase::Revealed => Ok(controller.gate().payload.clone()),
        _ => Err(CliError::Locked(
            controller
                .current_state()
                .error_message
                .clone()
                .unwrap_or_default(),
        )),
    }
}
