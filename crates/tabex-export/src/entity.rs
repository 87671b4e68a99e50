/// A record type backed by a store table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityType {
    name: String,
    table: String,
    columns: Vec<String>,
    parent: Option<Box<EntityType>>,
}

impl EntityType {
    pub fn new<I, S>(name: impl Into<String>, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            parent: None,
        }
    }

    /// A subtype sharing the parent's table and schema.
    ///
    /// Export configuration lookups fall back to the parent.
    pub fn subtype(name: impl Into<String>, parent: &EntityType) -> Self {
        Self {
            name: name.into(),
            table: parent.table.clone(),
            columns: parent.columns.clone(),
            parent: Some(Box::new(parent.clone())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column identifiers of the underlying table, in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn parent(&self) -> Option<&EntityType> {
        self.parent.as_deref()
    }

    /// This entity followed by its parents, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &EntityType> {
        std::iter::successors(Some(self), |entity| entity.parent())
    }
}
