//! Read-only commands: print the tree and the parent options.

use std::collections::HashSet;

use nestree::NodeId;
use nestree::page::TreeBranch;

use crate::backend::{build_page, open_store};
use crate::cli::{ParentsArgs, ShowArgs};
use crate::output::{OutputFormat, print_json, print_table};

/// Run the `show` command
pub fn show(args: &ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store, &args.store)?;
    let tree = page.tree()?;

    match args.format {
        OutputFormat::Human => {
            if tree.is_empty() {
                println!("Tree is empty.");
                return Ok(());
            }
            if let Some(label) = &page.definition().model_label {
                println!("{label}:");
            }
            let mut rows = Vec::new();
            for branch in &tree {
                collect_rows(branch, 0, &mut rows);
            }
            print_table(&["ID", "TITLE", "CAPTION", "KEY"], &rows);
        }
        OutputFormat::Json => print_json(&tree)?,
    }
    Ok(())
}

/// Flatten a branch into table rows, indenting titles by nesting level.
fn collect_rows(branch: &TreeBranch, level: usize, rows: &mut Vec<Vec<String>>) {
    rows.push(vec![
        branch.node.id.to_string(),
        format!("{}{}", "  ".repeat(level), branch.title),
        branch.caption.clone().unwrap_or_default(),
        branch.key.clone(),
    ]);
    for child in &branch.children {
        collect_rows(child, level + 1, rows);
    }
}

/// Run the `parents` command
pub fn parents(args: &ParentsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&args.store)?;
    let page = build_page(store, &args.store)?;
    let for_node = args.for_node.map(|id| page.scope().find(id)).transpose()?;
    let select = page.parent_select()?;

    let eligible: HashSet<NodeId> = select
        .eligible_options(for_node.as_ref())?
        .into_iter()
        .map(|option| option.id)
        .collect();
    let entries: Vec<_> = select
        .options()
        .iter()
        .map(|option| (option, !eligible.contains(&option.id)))
        .collect();

    match args.format {
        OutputFormat::Human => {
            if entries.is_empty() {
                println!("No parent options.");
                return Ok(());
            }
            println!("{}:", select.label());
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|(option, disabled)| {
                    vec![
                        option.id.to_string(),
                        option.label.clone(),
                        if *disabled { "disabled" } else { "" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["ID", "LABEL", ""], &rows);
        }
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = entries
                .iter()
                .map(|(option, disabled)| {
                    serde_json::json!({
                        "id": option.id,
                        "label": option.label,
                        "disabled": disabled,
                    })
                })
                .collect();
            print_json(&values)?;
        }
    }
    Ok(())
}
