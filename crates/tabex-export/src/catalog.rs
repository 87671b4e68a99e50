//! Inventory of exportable entity types.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tabex_format::FormatRegistry;
use tabex_model::Result;
use tracing::info;

use crate::config::ExportConfig;
use crate::entity::EntityType;
use crate::options::ExportOptions;

#[derive(Debug, Clone)]
struct Declaration {
    entity: EntityType,
    config: ExportConfig,
}

/// Entity types that opted into exporting, keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct ExportCatalog {
    declarations: BTreeMap<String, Declaration>,
}

impl ExportCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt `entity` into exporting. Re-declaring replaces the previous
    /// configuration.
    pub fn declare(
        &mut self,
        entity: &EntityType,
        options: &ExportOptions,
        registry: &FormatRegistry,
    ) -> Result<&ExportConfig> {
        let config = ExportConfig::declare(entity, options, registry)?;
        info!(entity = entity.name(), table = entity.table(), "entity declared exportable");
        let declaration = Declaration {
            entity: entity.clone(),
            config,
        };
        let slot = match self.declarations.entry(entity.name().to_string()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(declaration);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(declaration),
        };
        Ok(&slot.config)
    }

    /// Configuration for `entity`, falling back through its parents.
    pub fn config_for(&self, entity: &EntityType) -> Option<&ExportConfig> {
        entity
            .ancestry()
            .find_map(|ancestor| self.declarations.get(ancestor.name()))
            .map(|declaration| &declaration.config)
    }

    /// True when `entity` itself was declared (inheritance not considered).
    pub fn is_declared(&self, entity: &EntityType) -> bool {
        self.declarations.contains_key(entity.name())
    }

    /// `(table name, entity name)` pairs sorted by table name.
    pub fn entity_list(&self) -> Vec<(String, String)> {
        let mut list: Vec<(String, String)> = self
            .declarations
            .values()
            .map(|declaration| {
                (
                    declaration.entity.table().to_string(),
                    declaration.entity.name().to_string(),
                )
            })
            .collect();
        list.sort();
        list
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
