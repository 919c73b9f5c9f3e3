//! Categories and the category tree.

mod domain;
mod forest;
mod hierarchy;

pub use domain::{Category, CategoryColumn, CategoryName};
pub use forest::{CategoryNode, CategoryRow, ROOT_PARENT_ID, build_forest, render_forest};
pub use hierarchy::{create_from_tree, get_all_parents, get_parent, get_subcategories};
