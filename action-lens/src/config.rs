//! Command-line arguments and the resolved configuration

use std::io;
use std::path::{Path, PathBuf};

use action_lens_core::panels::{PanelFlags, PanelToggles};
use action_lens_core::{default_inspector_keybindings, InspectorContext, Keybindings};
use clap::Parser;
use thiserror::Error;

use crate::transport::DEFAULT_LISTEN;

/// Inspect actions dispatched by a connected application
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "action-lens")]
#[command(about = "Inspect actions dispatched by an instrumented application")]
pub struct Args {
    /// Address the instrumented application connects to
    #[arg(long, short, default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Load records from a file in the wire format instead of listening
    #[arg(long, short)]
    pub replay: Option<PathBuf>,

    /// Keep records and selection in this file across restarts
    #[arg(long, short)]
    pub session: Option<PathBuf>,

    /// Hide the dispatch box
    #[arg(long)]
    pub no_dispatch: bool,

    /// Show only the state tree, without the Diff tab
    #[arg(long)]
    pub no_tabs: bool,

    /// Panels to turn off, comma separated
    /// (dispatch_box, state_tabs, search_bar, auto_scroll)
    #[arg(long, value_delimiter = ',')]
    pub disable: Vec<String>,

    /// JSON file with keybinding overrides
    #[arg(long)]
    pub keybindings: Option<PathBuf>,

    /// Write logs to this file; filtered by RUST_LOG
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown panel '{name}', expected one of: {}", PanelFlags::all_flags().join(", "))]
    UnknownPanel { name: String },
    #[error("failed to read keybindings {}: {source}", .path.display())]
    KeybindingsIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid keybindings in {}: {source}", .path.display())]
    KeybindingsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Listen(String),
    Replay(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: Source,
    pub session: Option<PathBuf>,
    pub panels: PanelFlags,
    pub keybindings: Keybindings<InspectorContext>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let panels = resolve_panels(&args)?;
        let keybindings = load_keybindings(args.keybindings.as_deref())?;
        let source = match args.replay {
            Some(path) => Source::Replay(path),
            None => Source::Listen(args.listen),
        };

        Ok(Self {
            source,
            session: args.session,
            panels,
            keybindings,
            log_file: args.log_file,
        })
    }
}

fn resolve_panels(args: &Args) -> Result<PanelFlags, ConfigError> {
    let mut panels = PanelFlags::default();
    if args.no_dispatch {
        panels.remove(PanelFlags::DISPATCH_BOX);
    }
    if args.no_tabs {
        panels.remove(PanelFlags::STATE_TABS);
    }
    for name in &args.disable {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if panels.is_enabled(name).is_none() {
            return Err(ConfigError::UnknownPanel {
                name: name.to_string(),
            });
        }
        panels.disable(name);
    }
    Ok(panels)
}

/// Default bindings, with the user's file merged on top when given
pub fn load_keybindings(path: Option<&Path>) -> Result<Keybindings<InspectorContext>, ConfigError> {
    let defaults = default_inspector_keybindings();
    let Some(path) = path else {
        return Ok(defaults);
    };

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::KeybindingsIo {
        path: path.to_path_buf(),
        source,
    })?;
    let user: Keybindings<InspectorContext> =
        serde_json::from_str(&text).map_err(|source| ConfigError::KeybindingsFormat {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Keybindings::merge(defaults, user))
}
