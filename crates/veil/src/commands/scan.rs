//! `veil scan` command implementation.

use std::path::PathBuf;

use clap::Args;
use veil_gate::{GatedBlock, Page, scan};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scan command.
#[derive(Args)]
pub(crate) struct ScanArgs {
    /// Page JSON exported from the content store.
    page: PathBuf,
}

impl ScanArgs {
    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be loaded.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let page = Page::load(&self.page)?;
        let gated = scan(&page);

        if gated.is_empty() {
            output.warning(&format!("No gated blocks in {}", self.page.display()));
            return Ok(());
        }

        for block in &gated {
            output.result(&format_row(block))?;
        }
        Ok(())
    }
}

/// One tab-separated row per gated block. Secrets and payloads are not printed.
fn format_row(block: &GatedBlock) -> String {
    let credential = if block.gate.uses_default_credential() {
        "default"
    } else {
        "password"
    };
    format!(
        "{}\t{}\t{}\t{} chars",
        block.id,
        block.block_type,
        credential,
        block.gate.payload.chars().count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use veil_gate::{BlockType, GateSpec};

    #[test]
    fn test_format_row_hides_secret() {
        let row = format_row(&GatedBlock {
            id: "b1".to_owned(),
            block_type: BlockType::Callout,
            gate: GateSpec::password("hunter2", "héllo"),
        });
        assert_eq!(row, "b1\tcallout\tpassword\t5 chars");
    }

    #[test]
    fn test_format_row_default_credential() {
        let row = format_row(&GatedBlock {
            id: "b2".to_owned(),
            block_type: BlockType::Code,
            gate: GateSpec::encrypted(""),
        });
        assert_eq!(row, "b2\tcode\tdefault\t0 chars");
    }
}
