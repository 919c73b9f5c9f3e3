//! Walks the category hierarchy through a repository.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    Error,
    category::{Category, CategoryColumn, CategoryName},
    repository::{Filter, Repository},
};

/// Get the parent of `category`, or `None` for a top-level category.
///
/// # Errors
/// Returns [Error::InvalidParent] if the parent ID does not refer to a stored category.
pub fn get_parent(
    category: &Category,
    repository: &impl Repository<Category>,
) -> Result<Option<Category>, Error> {
    let Some(parent_id) = category.parent else {
        return Ok(None);
    };

    repository
        .get(parent_id)?
        .map(Some)
        .ok_or(Error::InvalidParent(parent_id))
}

/// Get every ancestor of `category`, nearest first.
///
/// # Errors
/// Returns [Error::CategoryCycle] if the chain of parents loops, or
/// [Error::InvalidParent] if it refers to a missing category.
pub fn get_all_parents(
    category: &Category,
    repository: &impl Repository<Category>,
) -> Result<Vec<Category>, Error> {
    let mut parents = Vec::new();
    let mut seen = HashSet::from([category.id]);
    let mut current = category.clone();

    while let Some(parent) = get_parent(&current, repository)? {
        if !seen.insert(parent.id) {
            return Err(Error::CategoryCycle(parent.id));
        }

        parents.push(parent.clone());
        current = parent;
    }

    Ok(parents)
}

/// Get every descendant of `category`, breadth first.
pub fn get_subcategories(
    category: &Category,
    repository: &impl Repository<Category>,
) -> Result<Vec<Category>, Error> {
    let mut subcategories = Vec::new();
    let mut seen = HashSet::from([category.id]);
    let mut queue = VecDeque::from([category.id]);

    while let Some(parent_id) = queue.pop_front() {
        let children = repository.get_all(&Filter::all().with(CategoryColumn::Parent, parent_id))?;

        for child in children {
            if seen.insert(child.id) {
                queue.push_back(child.id);
                subcategories.push(child);
            }
        }
    }

    Ok(subcategories)
}

/// Create categories from `(name, parent name)` pairs and add them to `repository`.
///
/// A parent must appear before its children. A parent name that has not been
/// created yet by an earlier pair is looked up among the categories already in
/// the repository.
///
/// # Errors
/// Returns [Error::EmptyCategoryName] for an empty name, or [Error::NotFound]
/// if a parent name cannot be resolved.
pub fn create_from_tree(
    tree: &[(&str, Option<&str>)],
    repository: &impl Repository<Category>,
) -> Result<Vec<Category>, Error> {
    let mut ids_by_name: HashMap<String, i64> = repository
        .get_all(&Filter::all())?
        .into_iter()
        .map(|category| (category.name.to_string(), category.id))
        .collect();
    let mut created = Vec::with_capacity(tree.len());

    for (name, parent_name) in tree {
        let name = CategoryName::new(name)?;
        let parent = match parent_name {
            Some(parent_name) => Some(
                *ids_by_name
                    .get(parent_name.trim())
                    .ok_or(Error::NotFound)?,
            ),
            None => None,
        };

        let mut category = Category::new(name, parent);
        repository.add(&mut category)?;
        ids_by_name.insert(category.name.to_string(), category.id);
        created.push(category);
    }

    Ok(created)
}

#[cfg(test)]
mod hierarchy_tests {
    use crate::{Category, CategoryName, Error, MemoryRepository, repository::Repository};

    use super::{create_from_tree, get_all_parents, get_parent, get_subcategories};

    fn get_test_tree() -> (MemoryRepository<Category>, Vec<Category>) {
        let repository = MemoryRepository::new();
        let categories = create_from_tree(
            &[
                ("Food", None),
                ("Groceries", Some("Food")),
                ("Fruit", Some("Groceries")),
                ("Restaurants", Some("Food")),
                ("Transport", None),
            ],
            &repository,
        )
        .expect("Could not create test tree");

        (repository, categories)
    }

    #[test]
    fn create_from_tree_links_parents() {
        let (_, categories) = get_test_tree();

        let parents: Vec<Option<i64>> = categories.iter().map(|category| category.parent).collect();

        assert_eq!(parents, vec![None, Some(1), Some(2), Some(1), None]);
    }

    #[test]
    fn create_from_tree_fails_on_unknown_parent() {
        let repository = MemoryRepository::new();

        let result = create_from_tree(&[("Groceries", Some("Food"))], &repository);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_parent_of_root_is_none() {
        let (repository, categories) = get_test_tree();

        assert_eq!(get_parent(&categories[0], &repository), Ok(None));
    }

    #[test]
    fn get_parent_returns_parent() {
        let (repository, categories) = get_test_tree();

        assert_eq!(
            get_parent(&categories[1], &repository),
            Ok(Some(categories[0].clone()))
        );
    }

    #[test]
    fn get_all_parents_is_nearest_first() {
        let (repository, categories) = get_test_tree();

        let parents = get_all_parents(&categories[2], &repository).unwrap();

        assert_eq!(parents, vec![categories[1].clone(), categories[0].clone()]);
    }

    #[test]
    fn get_all_parents_detects_cycle() {
        let repository = MemoryRepository::<Category>::new();
        let mut first = Category::new(CategoryName::new_unchecked("A"), None);
        let mut second = Category::new(CategoryName::new_unchecked("B"), None);
        repository.add(&mut first).unwrap();
        repository.add(&mut second).unwrap();
        first.parent = Some(second.id);
        second.parent = Some(first.id);
        repository.update(&first).unwrap();
        repository.update(&second).unwrap();

        let result = get_all_parents(&first, &repository);

        assert_eq!(result, Err(Error::CategoryCycle(first.id)));
    }

    #[test]
    fn get_subcategories_returns_all_descendants() {
        let (repository, categories) = get_test_tree();

        let subcategories = get_subcategories(&categories[0], &repository).unwrap();

        let names: Vec<String> = subcategories
            .iter()
            .map(|category| category.name.to_string())
            .collect();
        assert_eq!(names, vec!["Groceries", "Restaurants", "Fruit"]);
    }

    #[test]
    fn get_subcategories_of_leaf_is_empty() {
        let (repository, categories) = get_test_tree();

        assert_eq!(get_subcategories(&categories[4], &repository), Ok(vec![]));
    }
}
