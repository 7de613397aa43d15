use std::collections::HashMap;
use std::sync::Arc;

use crate::action::Action;

/// A registry that maps action names to their implementations.
///
/// Actions are stored behind `Arc<dyn Action>` so they can be shared
/// across tasks safely. The registry itself is not thread-safe for
/// mutation; it is built once at startup and then owned immutably by the
/// dispatcher ("register once, dispatch many").
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Register an action. The action's name (from [`Action::name`]) is
    /// used as the lookup key.
    ///
    /// If an action with the same name already exists, it is replaced.
    pub fn register(&mut self, action: Arc<dyn Action>) {
        let name = action.name().to_owned();
        self.actions.insert(name, action);
    }

    /// Look up an action by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    /// Return a sorted list of all registered action names.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Return the number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Return `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
