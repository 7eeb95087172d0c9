use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::RwLock;

use crate::component::ComponentRef;
use crate::repository::{ComponentRepository, RepositoryError};

/// Repository holding every component in memory, keyed by id.
///
/// Holds the strong references of the graph; component descriptors only keep
/// weak edges to each other.
#[derive(Default)]
pub struct InMemoryRepository {
    components: RwLock<HashMap<String, ComponentRef>>,
    main_component: RwLock<Option<String>>,
}

impl InMemoryRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that an id can name a component
    pub fn validate_name(id: &str) -> std::result::Result<(), RepositoryError> {
        if id.is_empty() {
            return Err(RepositoryError::InvalidName {
                name: id.to_string(),
                reason: "component id is empty".to_string(),
            });
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(RepositoryError::InvalidName {
                name: id.to_string(),
                reason: "component id contains whitespace or control characters".to_string(),
            });
        }
        Ok(())
    }

    /// Register a component
    pub fn register(&self, component: ComponentRef) -> std::result::Result<(), RepositoryError> {
        let id = component.id().to_string();
        Self::validate_name(&id)?;

        let mut components = self.components.write();
        if components.contains_key(&id) {
            return Err(RepositoryError::AlreadyRegistered(id));
        }
        log::trace!("Registered component {}", id);
        components.insert(id, component);
        Ok(())
    }

    /// Remove a component; returns it if it was registered
    pub fn remove(&self, id: &str) -> Option<ComponentRef> {
        self.components.write().remove(id)
    }

    /// Designate the component hosting the main application
    pub fn set_main_component(&self, id: &str) -> std::result::Result<(), RepositoryError> {
        Self::validate_name(id)?;
        *self.main_component.write() = Some(id.to_string());
        Ok(())
    }

    /// Check if a component is registered
    pub fn contains(&self, id: &str) -> bool {
        self.components.read().contains_key(id)
    }

    /// All registered components, in no particular order
    pub fn components(&self) -> Vec<ComponentRef> {
        self.components.read().values().cloned().collect()
    }

    /// Indices of the listed components that `component` needs, directly or through
    /// components outside the list.
    fn prerequisites(
        index: usize,
        component: &ComponentRef,
        index_of: &HashMap<String, usize>,
    ) -> Vec<usize> {
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<ComponentRef> = Vec::new();
        visited.insert(component.id().to_string());
        push_requirements(component, &mut stack);

        while let Some(next) = stack.pop() {
            if !visited.insert(next.id().to_string()) {
                continue;
            }
            if let Some(&j) = index_of.get(next.id()) {
                if j != index && !found.contains(&j) {
                    found.push(j);
                }
            }
            push_requirements(&next, &mut stack);
        }
        found
    }
}

fn push_requirements(component: &ComponentRef, stack: &mut Vec<ComponentRef>) {
    stack.extend(component.parent());
    stack.extend(component.depended_components());
}

impl ComponentRepository for InMemoryRepository {
    fn resolve_component(&self, id: &str) -> std::result::Result<ComponentRef, RepositoryError> {
        Self::validate_name(id)?;
        self.components
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Kahn's algorithm over the listed components. Ties keep the input order and
    /// members of a cycle are appended in input order.
    fn sort_components(&self, components: &mut Vec<ComponentRef>) {
        let count = components.len();
        let mut index_of: HashMap<String, usize> = HashMap::new();
        for (i, component) in components.iter().enumerate() {
            index_of.entry(component.id().to_string()).or_insert(i);
        }

        let mut in_degree = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (i, component) in components.iter().enumerate() {
            let prerequisites = Self::prerequisites(i, component, &index_of);
            in_degree[i] = prerequisites.len();
            for j in prerequisites {
                dependents[j].push(i);
            }
        }

        let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(count);
        let mut placed = vec![false; count];
        while let Some(i) = queue.pop_front() {
            order.push(i);
            placed[i] = true;
            for &dependent in &dependents[i] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() < count {
            let cyclic: Vec<&str> = (0..count)
                .filter(|&i| !placed[i])
                .map(|i| components[i].id())
                .collect();
            log::debug!("Components in a dependency cycle keep their input order: {:?}", cyclic);
            order.extend((0..count).filter(|&i| !placed[i]));
        }

        let mut slots: Vec<Option<ComponentRef>> = components.drain(..).map(Some).collect();
        components.extend(order.into_iter().filter_map(|i| slots[i].take()));
    }

    fn main_component_id(&self) -> Option<String> {
        self.main_component.read().clone()
    }
}
