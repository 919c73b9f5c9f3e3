//! Reassembles the category forest from flat parent-pointer rows.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::{DatabaseId, Error, UNASSIGNED_ID};

/// The parent ID used by rows that have no parent.
pub const ROOT_PARENT_ID: DatabaseId = 0;

/// A flat category row: the ID, the name and the parent ID, or
/// [ROOT_PARENT_ID] for a top-level category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    /// The ID of the category.
    pub id: DatabaseId,
    /// The display name of the category.
    pub name: String,
    /// The parent ID, [ROOT_PARENT_ID] for top-level categories.
    pub parent_id: DatabaseId,
}

/// A category together with its nested subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    /// The ID of the category.
    pub id: DatabaseId,
    /// The display name of the category.
    pub name: String,
    /// Depth in the hierarchy (0 = root).
    pub depth: usize,
    /// Names from the root down to this category joined with '/', e.g. "Food/Groceries".
    pub path: String,
    /// Child categories, in the order their rows were given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
}

/// Build the category forest from flat rows.
///
/// Rows whose parent is [ROOT_PARENT_ID] become roots, every other row is
/// attached under the row with the matching ID. Siblings keep the order of
/// `rows`.
///
/// # Errors
///
/// - [Error::UnassignedId] if a row has the ID 0.
/// - [Error::DuplicateCategoryId] if two rows share an ID.
/// - [Error::DanglingParent] if a parent ID is not in `rows`.
/// - [Error::CategoryCycle] if a row cannot be reached from any root.
pub fn build_forest(rows: &[CategoryRow]) -> Result<Vec<CategoryNode>, Error> {
    let mut ids = HashSet::with_capacity(rows.len());

    for row in rows {
        if row.id == UNASSIGNED_ID {
            return Err(Error::UnassignedId);
        }

        if !ids.insert(row.id) {
            return Err(Error::DuplicateCategoryId(row.id));
        }
    }

    let mut children_by_parent: HashMap<DatabaseId, Vec<&CategoryRow>> = HashMap::new();

    for row in rows {
        if row.parent_id != ROOT_PARENT_ID && !ids.contains(&row.parent_id) {
            return Err(Error::DanglingParent {
                id: row.id,
                parent_id: row.parent_id,
            });
        }

        children_by_parent
            .entry(row.parent_id)
            .or_default()
            .push(row);
    }

    let mut placed = HashSet::with_capacity(rows.len());
    let forest: Vec<CategoryNode> = children_by_parent
        .get(&ROOT_PARENT_ID)
        .map(|roots| {
            roots
                .iter()
                .map(|root| attach(root, 0, None, &children_by_parent, &mut placed))
                .collect()
        })
        .unwrap_or_default();

    if let Some(unreachable) = rows.iter().find(|row| !placed.contains(&row.id)) {
        return Err(Error::CategoryCycle(unreachable.id));
    }

    Ok(forest)
}

fn attach(
    row: &CategoryRow,
    depth: usize,
    parent_path: Option<&str>,
    children_by_parent: &HashMap<DatabaseId, Vec<&CategoryRow>>,
    placed: &mut HashSet<DatabaseId>,
) -> CategoryNode {
    placed.insert(row.id);

    let path = match parent_path {
        Some(parent_path) => format!("{parent_path}/{}", row.name),
        None => row.name.clone(),
    };

    let children: Vec<CategoryNode> = children_by_parent
        .get(&row.id)
        .map(|children| {
            children
                .iter()
                .map(|child| {
                    attach(
                        child,
                        depth + 1,
                        Some(path.as_str()),
                        children_by_parent,
                        placed,
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    CategoryNode {
        id: row.id,
        name: row.name.clone(),
        depth,
        path,
        children,
    }
}

/// Render the forest as an indented tree, one category per line.
pub fn render_forest(forest: &[CategoryNode]) -> String {
    let mut output = String::new();

    for node in forest {
        render_node(node, &mut output);
    }

    output
}

fn render_node(node: &CategoryNode, output: &mut String) {
    output.push_str(&"  ".repeat(node.depth));
    output.push_str(&format!("{} [{}]\n", node.name, node.id));

    for child in &node.children {
        render_node(child, output);
    }
}
