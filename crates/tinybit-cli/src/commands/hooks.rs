//! Hook registration inspection commands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use tinybit_content::register_builtin_targets;
use tinybit_core::config::AppConfig;
use tinybit_core::error::AppError;
use tinybit_core::traits::{AttachmentStore, ViewContext};
use tinybit_hooks::{HookRegistrar, HookRegistry};

/// Arguments for hook commands
#[derive(Debug, Args)]
pub struct HooksArgs {
    /// Hooks subcommand
    #[command(subcommand)]
    pub command: HooksCommand,
}

/// Hook subcommands
#[derive(Debug, Subcommand)]
pub enum HooksCommand {
    /// List the hooks declared by the built-in targets
    List {
        /// Only show hooks of this target
        #[arg(short, long)]
        target: Option<String>,
    },
}

/// Hook display row
#[derive(Debug, Serialize, Tabled)]
struct HookRow {
    /// Hook name
    hook: String,
    /// Target id
    target: String,
    /// Resolved kind
    kind: String,
    /// Resolved member
    member: String,
    /// Priority
    priority: i64,
    /// Accepted args
    accepted_args: i64,
}

/// View stub: inspection needs the targets, not a live host.
struct NoView;

impl ViewContext for NoView {
    fn is_single(&self) -> bool {
        false
    }
}

/// Attachment stub with no files behind it.
struct NoAttachments;

impl AttachmentStore for NoAttachments {
    fn attached_file(&self, _attachment_id: u64) -> Option<PathBuf> {
        None
    }

    fn mime_type(&self, _attachment_id: u64) -> Option<String> {
        None
    }
}

/// Execute hook commands
pub async fn execute(
    args: &HooksArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        HooksCommand::List { target } => {
            let registry = Arc::new(HookRegistry::new());
            let registrar = HookRegistrar::new(registry);

            let records = register_builtin_targets(
                &registrar,
                config,
                Arc::new(NoView),
                Arc::new(NoAttachments),
            )
            .await?;

            let rows: Vec<HookRow> = records
                .iter()
                .filter(|r| target.as_deref().map_or(true, |t| r.target == t))
                .map(|r| HookRow {
                    hook: r.hook.clone(),
                    target: r.target.clone(),
                    kind: r
                        .kind
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    member: r.member.clone().unwrap_or_else(|| "-".to_string()),
                    priority: r.priority,
                    accepted_args: r.accepted_args,
                })
                .collect();

            output::print_list(&rows, format);
        }
    }

    Ok(())
}
