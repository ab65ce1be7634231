//! Schema Dumper - Declarative rendering of the enum catalog
//!
//! Renders one `create_enum` statement per type, ordered by type name, with
//! values in their stored order. An empty catalog renders nothing. Rendering
//! only reads the catalog.

use std::io::Write;

use crate::binding::ColumnEnumLookup;
use crate::catalog::EnumCatalog;
use crate::connection::EnumConnection;
use crate::error::EnumResult;
use crate::manager::EnumManager;

/// Render a catalog as `create_enum "<name>", ["<value>", ...]` statements
pub fn render(catalog: &EnumCatalog) -> Vec<String> {
    catalog
        .iter()
        .map(|(name, values)| {
            let values: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
            format!("create_enum {:?}, [{}]", name, values.join(", "))
        })
        .collect()
}

/// Column option annotating an enum-backed column, e.g. `enum_type: "shirt_size"`
pub fn column_options(lookup: &dyn ColumnEnumLookup, table: &str, column: &str) -> Option<String> {
    lookup
        .lookup_enum_type_for_column(table, column)
        .map(|enum_type| format!("enum_type: {:?}", enum_type))
}

/// Write the rendered statements followed by a blank line.
///
/// Nothing is written for an empty catalog.
pub fn dump<W: Write>(catalog: &EnumCatalog, writer: &mut W) -> std::io::Result<()> {
    let statements = render(catalog);
    if statements.is_empty() {
        return Ok(());
    }

    for statement in &statements {
        writeln!(writer, "  {}", statement)?;
    }
    writeln!(writer)
}

/// Dumps the enum section of a schema from a manager's catalog
pub struct SchemaDumper<'a, C> {
    manager: &'a mut EnumManager<C>,
}

impl<'a, C: EnumConnection> SchemaDumper<'a, C> {
    pub fn new(manager: &'a mut EnumManager<C>) -> Self {
        Self { manager }
    }

    /// Render the catalog, loading it first if the cache is empty
    pub async fn render_enums(&mut self) -> EnumResult<Vec<String>> {
        let catalog = self.manager.list_enums().await?;
        Ok(render(catalog))
    }

    /// Write the enum section of the schema
    pub async fn dump_enums<W: Write>(&mut self, writer: &mut W) -> EnumResult<()> {
        let catalog = self.manager.list_enums().await?;
        dump(catalog, writer)?;
        Ok(())
    }
}
