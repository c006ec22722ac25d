use crate::catalog::{Catalog, EmptyCatalog};
use crate::system_event_handler::SystemEventHandler;

/// Provides configuration details for reader construction.
pub struct ReadConfig {
    pub(crate) catalog: Box<dyn Catalog>,
    pub(crate) event_handler: Option<Box<dyn SystemEventHandler>>,
}

impl ReadConfig {
    pub fn new() -> Self {
        ReadConfig::new_with_catalog(EmptyCatalog::default())
    }

    pub fn new_with_catalog(catalog: impl Catalog + 'static) -> Self {
        ReadConfig {
            catalog: Box::new(catalog),
            event_handler: None,
        }
    }

    /// The catalog that shared symbol table imports are resolved against.
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub(crate) fn set_catalog(&mut self, catalog: impl Catalog + 'static) {
        self.catalog = Box::new(catalog);
    }

    pub(crate) fn set_event_handler(&mut self, handler: impl SystemEventHandler + 'static) {
        self.event_handler = Some(Box::new(handler));
    }
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self::new()
    }
}
