//! Blocking Notion REST transport.
//!
//! | operation  | request                                  |
//! |------------|------------------------------------------|
//! | open       | `GET   /v1/databases/{id}`               |
//! | rows       | `POST  /v1/databases/{id}/query` (paged) |
//! | create_row | `POST  /v1/pages`                        |
//! | set_field  | `PATCH /v1/pages/{row}`                  |
//! | delete_row | `PATCH /v1/pages/{row}` `archived: true` |

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use starsync_core::{Fields, RowId, Secret, Table, TableError, TableRow};

use crate::locator::database_id;
use crate::property::{self, PropertyKind};

pub const API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

const QUERY_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DatabaseSchema {
    properties: BTreeMap<String, SchemaProperty>,
}

#[derive(Debug, Deserialize)]
struct SchemaProperty {
    #[serde(rename = "type")]
    kind: PropertyKind,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<PageObject>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

/// Column name → declared type, from a `GET /databases/{id}` body.
pub(crate) fn decode_schema(body: Value) -> Result<BTreeMap<String, PropertyKind>, TableError> {
    let schema: DatabaseSchema = serde_json::from_value(body).map_err(|e| decode_err("open table", e))?;
    Ok(schema
        .properties
        .into_iter()
        .map(|(name, p)| (name, p.kind))
        .collect())
}

/// Rows and pagination info from a `POST /databases/{id}/query` body.
pub(crate) fn decode_rows(body: Value) -> Result<(Vec<TableRow>, Option<String>), TableError> {
    let page: QueryResponse = serde_json::from_value(body).map_err(|e| decode_err("list rows", e))?;
    let rows = page
        .results
        .into_iter()
        .map(|p| {
            let mut row = TableRow::new(p.id);
            for (name, value) in &p.properties {
                row.set_field(name.clone(), property::read_value(value));
            }
            row
        })
        .collect();
    let next = if page.has_more { page.next_cursor } else { None };
    Ok((rows, next))
}

fn decode_err(operation: &str, e: serde_json::Error) -> TableError {
    TableError::Decode {
        operation: operation.to_string(),
        message: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// NotionTable
// ---------------------------------------------------------------------------

/// A Notion database seen as a [`Table`].
pub struct NotionTable {
    agent: ureq::Agent,
    base_url: String,
    token: Secret,
    database_id: String,
    schema: BTreeMap<String, PropertyKind>,
}

impl NotionTable {
    /// Connect to the database named by `locator` and check that every
    /// column in `required_fields` exists.
    pub fn open(
        locator: &str,
        token: Secret,
        timeout: Duration,
        required_fields: &[&str],
    ) -> Result<Self, TableError> {
        Self::open_at(API_BASE, locator, token, timeout, required_fields)
    }

    /// [`NotionTable::open`] against a custom API base URL.
    pub fn open_at(
        base_url: &str,
        locator: &str,
        token: Secret,
        timeout: Duration,
        required_fields: &[&str],
    ) -> Result<Self, TableError> {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("starsync/", env!("CARGO_PKG_VERSION")))
            .build();
        let mut table = Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            database_id: database_id(locator)?,
            schema: BTreeMap::new(),
        };

        let body = table.call("GET", &format!("databases/{}", table.database_id), "open table", None)?;
        table.schema = decode_schema(body)?;
        for field in required_fields {
            table.kind_of(field)?;
        }
        tracing::debug!(database = %table.database_id, columns = table.schema.len(), "opened table");
        Ok(table)
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    fn kind_of(&self, field: &str) -> Result<&PropertyKind, TableError> {
        self.schema.get(field).ok_or_else(|| TableError::UnknownField {
            field: field.to_string(),
        })
    }

    fn properties(&self, fields: &Fields) -> Result<Map<String, Value>, TableError> {
        let mut props = Map::new();
        for (field, value) in fields {
            let kind = self.kind_of(field)?;
            props.insert(field.clone(), property::write_value(field, kind, value)?);
        }
        Ok(props)
    }

    /// Send one request and return the decoded JSON body.
    fn call(
        &self,
        method: &str,
        path: &str,
        operation: &str,
        body: Option<Value>,
    ) -> Result<Value, TableError> {
        let request = self
            .agent
            .request(method, &format!("{}/{}", self.base_url, path))
            .set("Authorization", &format!("Bearer {}", self.token.expose()))
            .set("Notion-Version", NOTION_VERSION);

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(resp) => resp.into_json::<Value>().map_err(|e| TableError::Decode {
                operation: operation.to_string(),
                message: e.to_string(),
            }),
            Err(ureq::Error::Status(status, resp)) => Err(TableError::Status {
                operation: operation.to_string(),
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(t)) => Err(TableError::Transport {
                operation: operation.to_string(),
                message: t.to_string(),
            }),
        }
    }

    /// `PATCH /pages/{row}`, mapping 404 to [`TableError::RowNotFound`].
    fn patch_page(&self, row: &RowId, operation: &str, body: Value) -> Result<(), TableError> {
        match self.call("PATCH", &format!("pages/{row}"), operation, Some(body)) {
            Ok(_) => Ok(()),
            Err(TableError::Status { status: 404, .. }) => Err(TableError::RowNotFound(row.clone())),
            Err(e) => Err(e),
        }
    }
}

impl Table for NotionTable {
    fn rows(&self) -> Result<Vec<TableRow>, TableError> {
        let path = format!("databases/{}/query", self.database_id);
        let mut rows = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let mut body = json!({ "page_size": QUERY_PAGE_SIZE });
            if let Some(c) = &cursor {
                body["start_cursor"] = Value::String(c.clone());
            }
            let (page, next) = decode_rows(self.call("POST", &path, "list rows", Some(body))?)?;
            tracing::debug!(rows = page.len(), "fetched table page");
            rows.extend(page);
            match next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(rows)
    }

    fn create_row(&mut self, fields: &Fields) -> Result<RowId, TableError> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": self.properties(fields)?,
        });
        let created: CreatedPage = serde_json::from_value(self.call("POST", "pages", "create row", Some(body))?)
            .map_err(|e| decode_err("create row", e))?;
        Ok(RowId(created.id))
    }

    fn set_field(&mut self, row: &RowId, field: &str, value: &str) -> Result<(), TableError> {
        let mut fields = Fields::new();
        fields.insert(field.to_string(), value.to_string());
        let body = json!({ "properties": self.properties(&fields)? });
        self.patch_page(row, "update row", body)
    }

    fn delete_row(&mut self, row: &RowId) -> Result<(), TableError> {
        self.patch_page(row, "delete row", json!({ "archived": true }))
    }
}
