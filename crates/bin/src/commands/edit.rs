//! Commands that change the tree and save the store afterwards.

use nestree::{Attributes, page::NodeMoved};

use crate::backend::{build_page, open_store, save_store};
use crate::cli::{CreateArgs, DeleteArgs, EditArgs, FixArgs, MoveArgs};
use crate::output::{OutputFormat, print_json, print_response};

/// Run the `move` command
///
/// The current parent and position are read from the store, so only the
/// destination has to be given.
pub fn move_node(args: &MoveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store.clone(), &args.store)?;

    let node = page.scope().find(args.id)?;
    let from = page.scope().position(node.id)?;
    let moved = NodeMoved {
        id: node.id,
        ancestor: node.parent_id.map(|id| id.to_string()),
        parent: args.parent.map(|id| id.to_string()),
        from,
        to: args.to,
    };

    let response = page.on_node_moved(moved)?;
    if response.is_success() {
        save_store(&store, &args.store)?;
    }
    print_response(&response, args.format)
}

/// Run the `create` command
pub fn create(args: &CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store.clone(), &args.store)?;

    let attributes: Attributes = args.attributes.iter().cloned().collect();
    let (node, response) = page.create_node(args.parent, attributes)?;
    save_store(&store, &args.store)?;

    match args.format {
        OutputFormat::Human => {
            println!("Created node {}", node.id);
            print_response(&response, args.format)
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "node": node,
            "response": response,
        })),
    }
}

/// Run the `edit` command
///
/// Without `--parent` or `--root` the node keeps its current parent.
pub fn edit(args: &EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store.clone(), &args.store)?;

    let node = page.scope().find(args.id)?;
    let parent = if args.root {
        None
    } else {
        args.parent.or(node.parent_id)
    };
    let mut attributes = node.attributes;
    attributes.extend(args.attributes.iter().cloned());

    let (saved, response) = page.edit_node(node.id, attributes, parent)?;
    save_store(&store, &args.store)?;

    match args.format {
        OutputFormat::Human => {
            println!("Saved node {}", saved.id);
            print_response(&response, args.format)
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "node": saved,
            "response": response,
        })),
    }
}

/// Run the `delete` command
pub fn delete(args: &DeleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store.clone(), &args.store)?;

    let response = page.delete_node(args.id)?;
    save_store(&store, &args.store)?;
    print_response(&response, args.format)
}

/// Run the `fix` command
pub fn fix(args: &FixArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store.clone(), &args.store)?;

    let response = page.on_fix_tree_requested();
    if response.is_success() {
        save_store(&store, &args.store)?;
    }
    print_response(&response, args.format)
}
