//! Sources of shared symbol tables.
//!
//! A local symbol table's `imports` list names shared tables by `(name, version, max_id)`. The
//! reader hands each of those requests to a [`Catalog`], which answers with the closest table it
//! holds. See [the `symbols` section of the Ion docs](https://amazon-ion.github.io/ion-docs/docs/symbols.html#the-catalog).

use std::collections::{BTreeMap, HashMap};

use crate::imports::SymbolTableImport;
use crate::result::decoding_error;
use crate::shared_symbol_table::SharedSymbolTable;
use crate::IonResult;

/// A collection of shared symbol tables, keyed by name and version.
///
/// Implementors supply the two lookups. [`resolve`](Catalog::resolve) builds on them to answer
/// an import request, substituting another version when the requested one is missing.
pub trait Catalog {
    /// Returns the highest version of the table called `name`, if any.
    fn get_table(&self, name: &str) -> Option<&SharedSymbolTable>;

    /// Returns the table called `name` with exactly the given `version`, if any.
    fn get_table_with_version(&self, name: &str, version: usize) -> Option<&SharedSymbolTable>;

    /// Resolves an import of `name` at `version` that occupies `max_id` symbol IDs.
    ///
    /// The exact version is preferred; otherwise the highest available version stands in for
    /// it. The returned import always occupies `max_id` IDs, and IDs the substitute does not
    /// cover have unknown text. When `max_id` is `None` it is taken from the exact table. If
    /// there is no exact table to take it from, the request cannot be satisfied and a decoding
    /// error is returned.
    fn resolve(
        &self,
        name: &str,
        version: usize,
        max_id: Option<usize>,
    ) -> IonResult<SymbolTableImport> {
        let (table, found_exact_version) = match self.get_table_with_version(name, version) {
            Some(table) => (Some(table), true),
            None => (self.get_table(name), false),
        };
        let max_id = match (max_id, table) {
            (Some(max_id), _) => max_id,
            (None, Some(table)) if found_exact_version => table.max_id(),
            (None, _) => {
                return decoding_error(format!(
                    "import of '{name}' version {version} has no max_id and the catalog has no \
                     exact match"
                ))
            }
        };
        let is_exact = found_exact_version && table.map(SharedSymbolTable::max_id) == Some(max_id);
        Ok(SymbolTableImport::new(
            name,
            version,
            max_id,
            table.cloned(),
            is_exact,
        ))
    }
}

/// An in-memory [`Catalog`] that keeps every inserted version of each table.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    tables_by_name: HashMap<String, BTreeMap<usize, SharedSymbolTable>>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `table` to the catalog, replacing any table with the same name and version.
    pub fn insert_table(&mut self, table: SharedSymbolTable) {
        self.tables_by_name
            .entry(table.name().to_owned())
            .or_default()
            .insert(table.version(), table);
    }

    /// Builder-style variant of [`insert_table`](Self::insert_table).
    pub fn with_table(mut self, table: SharedSymbolTable) -> Self {
        self.insert_table(table);
        self
    }
}

impl Catalog for MapCatalog {
    fn get_table(&self, name: &str) -> Option<&SharedSymbolTable> {
        let (_highest_version, table) = self.tables_by_name.get(name)?.last_key_value()?;
        Some(table)
    }

    fn get_table_with_version(&self, name: &str, version: usize) -> Option<&SharedSymbolTable> {
        self.tables_by_name.get(name)?.get(&version)
    }
}

/// A [`Catalog`] with no tables. Every import resolves to IDs with unknown text.
#[derive(Debug, Clone, Default)]
pub struct EmptyCatalog {}

impl Catalog for EmptyCatalog {
    fn get_table(&self, _name: &str) -> Option<&SharedSymbolTable> {
        None
    }

    fn get_table_with_version(&self, _name: &str, _version: usize) -> Option<&SharedSymbolTable> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IonError;
    use rstest::*;

    fn table(name: &str, version: usize, symbols: &[&str]) -> IonResult<SharedSymbolTable> {
        let symbols = symbols.iter().map(|s| Some(s.to_string())).collect();
        SharedSymbolTable::new(name.to_string(), version, symbols)
    }

    // "T" versions 1 through 3, with 1, 2 and 3 symbols respectively
    fn versions_of_t() -> IonResult<MapCatalog> {
        Ok(MapCatalog::new()
            .with_table(table("T", 3, &["a", "b", "c"])?)
            .with_table(table("T", 1, &["a"])?)
            .with_table(table("T", 2, &["a", "b"])?))
    }

    #[test]
    fn lookups_by_name_and_version() -> IonResult<()> {
        let catalog = versions_of_t()?;
        assert_eq!(catalog.get_table("T").map(|t| t.version()), Some(3));
        assert_eq!(
            catalog.get_table_with_version("T", 2).map(|t| t.max_id()),
            Some(2)
        );
        assert!(catalog.get_table_with_version("T", 4).is_none());
        assert!(catalog.get_table("S").is_none());
        assert!(catalog.get_table("").is_none());
        Ok(())
    }

    #[test]
    fn inserting_the_same_version_replaces_it() -> IonResult<()> {
        let mut catalog = versions_of_t()?;
        catalog.insert_table(table("T", 2, &["x"])?);
        let replaced = catalog.get_table_with_version("T", 2);
        assert_eq!(replaced.and_then(|t| t.text_for(1)), Some("x"));
        assert_eq!(catalog.get_table("T").map(|t| t.version()), Some(3));
        Ok(())
    }

    #[rstest]
    // Exact version, no declared max_id
    #[case::exact(2, None, 2, true)]
    // Exact version with a matching max_id
    #[case::exact_with_max_id(2, Some(2), 2, true)]
    // Exact version, but the declared max_id disagrees with the table
    #[case::exact_version_other_max_id(1, Some(3), 3, false)]
    // Missing version: the highest version stands in
    #[case::substituted_version(7, Some(2), 2, false)]
    fn resolve_prefers_the_exact_version(
        #[case] version: usize,
        #[case] max_id: Option<usize>,
        #[case] expected_max_id: usize,
        #[case] expected_exact: bool,
    ) -> IonResult<()> {
        let catalog = versions_of_t()?;
        let import = catalog.resolve("T", version, max_id)?;
        assert_eq!(import.name(), "T");
        assert_eq!(import.version(), version);
        assert_eq!(import.max_id(), expected_max_id);
        assert_eq!(import.is_exact(), expected_exact);
        Ok(())
    }

    #[rstest]
    #[case::missing_version("T", 7)]
    #[case::missing_table("S", 1)]
    fn resolve_without_max_id_needs_an_exact_match(#[case] name: &str, #[case] version: usize) {
        let catalog = versions_of_t().expect("catalog");
        assert!(matches!(
            catalog.resolve(name, version, None),
            Err(IonError::Decoding(_))
        ));
    }

    #[test]
    fn empty_catalog_substitutes_nothing() -> IonResult<()> {
        let catalog = EmptyCatalog::default();
        assert!(catalog.get_table("T").is_none());
        assert!(catalog.get_table_with_version("T", 1).is_none());
        let import = catalog.resolve("T", 1, Some(4))?;
        assert_eq!(import.max_id(), 4);
        assert!(!import.is_exact());
        Ok(())
    }
}
