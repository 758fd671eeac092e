//! Entity manager configuration.

/// Configuration for an [`EntityManager`](crate::EntityManager).
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Fetch the entity definition before the first hydration so property
    /// values are coerced to their declared datatypes.
    ///
    /// Disabled by default. When disabled, entities hydrate with untyped
    /// values unless the definition was loaded explicitly through
    /// `EntityManager::definition`.
    pub typed_properties: bool,

    /// Refresh already cached instances in place when a full list fetch
    /// returns them again.
    pub refresh_on_list: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            typed_properties: false,
            refresh_on_list: true,
        }
    }
}

impl ManagerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether properties are coerced using the entity definition.
    #[must_use]
    pub const fn typed_properties(mut self, value: bool) -> Self {
        self.typed_properties = value;
        self
    }

    /// Sets whether full list fetches refresh cached instances.
    #[must_use]
    pub const fn refresh_on_list(mut self, value: bool) -> Self {
        self.refresh_on_list = value;
        self
    }
}
