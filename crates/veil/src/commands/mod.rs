//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod scan;
pub(crate) mod unlock;

pub(crate) use render::RenderArgs;
pub(crate) use scan::ScanArgs;
pub(crate) use unlock::UnlockArgs;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use veil_config::{CliSettings, Config, MemoBackend};
use veil_gate::{GatedBlock, PageRenderer};
use veil_memo::{FileMemo, MemoryMemo, NullMemo, SessionMemo};

use crate::error::CliError;

/// Session memo backend selectable on the command line.
///
/// The in-memory backend is not offered: each invocation is its own process,
/// so it would behave exactly like `none`.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum MemoArg {
    None,
    File,
}

impl From<MemoArg> for MemoBackend {
    fn from(arg: MemoArg) -> Self {
        match arg {
            MemoArg::None => Self::None,
            MemoArg::File => Self::File,
        }
    }
}

/// Configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover veil.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session memo backend (overrides config).
    #[arg(long, value_enum)]
    memo: Option<MemoArg>,

    /// Session memo directory for the file backend (overrides config).
    #[arg(long)]
    memo_dir: Option<PathBuf>,

    /// Session id; a new id starts with every gate locked (overrides config).
    #[arg(long)]
    session: Option<String>,

    /// Default credential for `{{encrypted:...}}` blocks (overrides config).
    #[arg(long, env = "VEIL_DEFAULT_CREDENTIAL", hide_env_values = true)]
    default_credential: Option<String>,
}

impl ConfigArgs {
    /// Load the configuration with these arguments applied.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            default_credential: self.default_credential.clone(),
            memo_backend: self.memo.map(MemoBackend::from),
            memo_dir: self.memo_dir.clone(),
            session: self.session.clone(),
            clear_error_on_input: None,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Open the session memo selected by the configuration.
pub(crate) fn open_memo(config: &Config) -> Arc<dyn SessionMemo> {
    let memo = &config.memo_resolved;
    match memo.backend {
        MemoBackend::None => Arc::new(NullMemo),
        MemoBackend::Memory => Arc::new(MemoryMemo::new()),
        MemoBackend::File => Arc::new(FileMemo::new(memo.dir.clone(), &memo.session)),
    }
}

/// Build a page renderer from the configuration.
///
/// The default credential is only required when one of `gated` relies on it.
/// The session memo is opened only when `ready` is set and there is a gated
/// block to look up, so plain renders leave the memo directory alone.
pub(crate) fn page_renderer(
    config: &Config,
    gated: &[GatedBlock],
    ready: bool,
) -> Result<PageRenderer, CliError> {
    let default_credential = if gated.iter().any(|g| g.gate.uses_default_credential()) {
        config.require_default_credential()?.to_owned()
    } else {
        config.gate.default_credential.clone().unwrap_or_default()
    };

    let memo: Arc<dyn SessionMemo> = if ready && !gated.is_empty() {
        open_memo(config)
    } else {
        Arc::new(NullMemo)
    };

    Ok(PageRenderer::new(default_credential, memo)
        .with_messages(config.messages.clone())
        .with_clear_error_on_input(config.gate.clear_error_on_input))
}
