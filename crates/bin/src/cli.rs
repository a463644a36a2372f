//! CLI argument definitions for the nestree binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nestree::NodeId;

use crate::output::OutputFormat;

/// Edit and repair nested-set trees stored in a JSON file
#[derive(Parser, Debug)]
#[command(name = "nestree")]
#[command(about = "nestree: reorder, reparent and repair nested-set trees")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree
    Show(ShowArgs),
    /// List parent options, optionally for editing a node
    Parents(ParentsArgs),
    /// Move a node to a position under a parent
    Move(MoveArgs),
    /// Create a node
    Create(CreateArgs),
    /// Change a node's payload and optionally its parent
    Edit(EditArgs),
    /// Delete a node and its subtree
    Delete(DeleteArgs),
    /// Rebuild the tree structure from parent links
    Fix(FixArgs),
    /// Serve the tree page as a JSON API
    Serve(ServeArgs),
}

/// Where the tree lives and how it is presented.
#[derive(clap::Args, Debug, Clone)]
pub struct StoreArgs {
    /// JSON file holding the store
    #[arg(short, long, default_value = "nestree.json", env = "NESTREE_FILE")]
    pub file: PathBuf,

    /// Attributes splitting a new store into independent trees
    #[arg(
        long = "scope-attribute",
        env = "NESTREE_SCOPE_ATTRIBUTES",
        value_delimiter = ','
    )]
    pub scope_attributes: Vec<String>,

    /// Restrict to one tree, as attribute=value (repeatable)
    #[arg(long = "scope", value_parser = parse_condition)]
    pub scope: Vec<(String, serde_json::Value)>,

    /// Attribute used as node title
    #[arg(long, default_value = "title", env = "NESTREE_LABEL_ATTRIBUTE")]
    pub label_attribute: String,

    /// Attribute shown next to the title
    #[arg(long, env = "NESTREE_CAPTION_ATTRIBUTE")]
    pub caption_attribute: Option<String>,

    /// Heading shown above the tree, e.g. "Menu items"
    #[arg(long, env = "NESTREE_MODEL_LABEL")]
    pub model_label: Option<String>,

    /// Tree configuration file (JSON)
    #[arg(long, env = "NESTREE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for the parents command
#[derive(clap::Args, Debug)]
pub struct ParentsArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Node being edited; its own subtree is marked disabled
    #[arg(long)]
    pub for_node: Option<NodeId>,

    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for the move command
#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Node to move
    pub id: NodeId,

    /// New parent; omit to move among the roots
    #[arg(long)]
    pub parent: Option<NodeId>,

    /// 0-indexed position among the new siblings
    #[arg(long, default_value_t = 0)]
    pub to: usize,

    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for the create command
#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Parent of the new node; omit to create a root
    #[arg(long)]
    pub parent: Option<NodeId>,

    /// Payload attribute as name=value (repeatable); values are parsed as
    /// JSON when possible
    #[arg(long = "set", value_parser = parse_condition)]
    pub attributes: Vec<(String, serde_json::Value)>,

    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for the edit command
#[derive(clap::Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Node to edit
    pub id: NodeId,

    /// New parent; the node becomes its last child
    #[arg(long, conflicts_with = "root")]
    pub parent: Option<NodeId>,

    /// Detach the node into a root
    #[arg(long)]
    pub root: bool,

    /// Payload attribute as name=value (repeatable), merged into the
    /// existing payload
    #[arg(long = "set", value_parser = parse_condition)]
    pub attributes: Vec<(String, serde_json::Value)>,

    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for the delete command
#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Node to delete
    pub id: NodeId,

    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for the fix command
#[derive(clap::Args, Debug)]
pub struct FixArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "NESTREE_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1", env = "NESTREE_HOST")]
    pub host: String,
}

/// Parses `name=value`, reading the value as JSON and falling back to a
/// plain string.
fn parse_condition(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing attribute name in '{raw}'"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((name.to_string(), value))
}
