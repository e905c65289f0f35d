//! Logic and schema records.
//!
//! Both record kinds are produced by an offline ingestion process and are
//! read-only to the retrieval core.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A stored example pairing a natural-language question with its SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicRecord {
    pub id: String,

    /// The question the SQL answers.
    pub natural_query: String,

    pub sql_query: String,

    /// Tables touched by the SQL, unique, in order of appearance.
    #[serde(default)]
    pub tables: Vec<String>,

    #[serde(default)]
    pub domain_tags: BTreeSet<String>,

    /// Vector distance to the current query. Populated at query time only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_distance: Option<f32>,
}

impl LogicRecord {
    pub fn new(
        id: impl Into<String>,
        natural_query: impl Into<String>,
        sql_query: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            natural_query: natural_query.into(),
            sql_query: sql_query.into(),
            tables: Vec::new(),
            domain_tags: BTreeSet::new(),
            embedding_distance: None,
        }
    }

    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self.dedup_tables();
        self
    }

    pub fn with_domain_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Drop repeated table names, keeping the first occurrence.
    pub fn dedup_tables(&mut self) {
        let mut seen = BTreeSet::new();
        self.tables.retain(|t| seen.insert(t.clone()));
    }
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,

    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default)]
    pub description: String,
}

impl ColumnInfo {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            description: description.into(),
        }
    }
}

/// A foreign-key join from the owning table to `target_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinInfo {
    pub target_table: String,
    pub join_condition: String,
}

impl JoinInfo {
    pub fn new(target_table: impl Into<String>, join_condition: impl Into<String>) -> Self {
        Self {
            target_table: target_table.into(),
            join_condition: join_condition.into(),
        }
    }
}

/// A stored description of one database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub table_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub columns: Vec<ColumnInfo>,

    #[serde(default)]
    pub joins: Vec<JoinInfo>,

    #[serde(default)]
    pub domain_tags: BTreeSet<String>,
}

impl SchemaRecord {
    pub fn new(table_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            description: description.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            domain_tags: BTreeSet::new(),
        }
    }

    pub fn with_column(mut self, column: ColumnInfo) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a join unless one to the same target with the same condition exists.
    pub fn with_join(mut self, join: JoinInfo) -> Self {
        if !self.joins.contains(&join) {
            self.joins.push(join);
        }
        self
    }

    pub fn with_domain_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Distinct join targets, in declaration order.
    pub fn join_targets(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.joins
            .iter()
            .map(|j| j.target_table.as_str())
            .filter(|t| seen.insert(*t))
            .collect()
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
