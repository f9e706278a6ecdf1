//! Document primitives shared by every store backend.
//!
//! Documents are JSON objects keyed by `_id`. Filters are plain
//! field-equality maps, updates carry `$set` / `$setOnInsert` halves, and the
//! only aggregation understood is a single `$group` + `$push` stage. Keeping
//! the matching, sorting and grouping rules here gives the SQLite and
//! in-memory stores identical semantics.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::utils::generate_entity_id;

/// A stored document (JSON object).
pub type Document = Map<String, Value>;

/// Primary key field of every document.
pub const ID_FIELD: &str = "_id";

/// Read the `_id` of a document as a string.
pub fn document_id(doc: &Document) -> Option<String> {
    doc.get(ID_FIELD).map(value_as_key)
}

fn value_as_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ensure the document has an `_id`, generating one when missing.
///
/// Returns the id.
pub fn ensure_id(doc: &mut Document) -> String {
    match document_id(doc) {
        Some(id) => id,
        None => {
            let id = generate_entity_id();
            doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

/// Field names usable in filters, sorts and group keys.
///
/// Dotted paths are deliberately not supported.
pub fn is_plain_field(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// =============================================================================
// Filters
// =============================================================================

/// Field-equality filter. A document matches when every field is equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    /// Empty filter (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on `_id`.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new().eq(ID_FIELD, id.into())
    }

    /// Add an equality constraint.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Value constrained for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `null` in a filter matches both an explicit null and a missing field.
    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|(field, expected)| match doc.get(field) {
            Some(actual) => actual == expected,
            None => expected.is_null(),
        })
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort direction for `find(..).sort(..)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Single-field sort specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Stable sort by one field. Null or missing values come first ascending and
/// last descending; ties keep their incoming (storage) order.
pub fn sort_documents(docs: &mut [Document], spec: &SortSpec) {
    docs.sort_by(|a, b| {
        let ordering = compare_values(a.get(&spec.field), b.get(&spec.field));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

// =============================================================================
// Updates
// =============================================================================

/// `$set` / `$setOnInsert` update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    /// Fields written on every match (and on upsert).
    pub set: Document,
    /// Fields written only when an upsert inserts a new document.
    pub set_on_insert: Document,
}

impl Update {
    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and_set(field, value)
    }

    pub fn and_set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    pub fn on_insert(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_on_insert.insert(field.into(), value.into());
        self
    }

    /// Apply `$set` to an existing document. `_id` is immutable and skipped.
    pub fn apply_to(&self, doc: &mut Document) {
        for (field, value) in &self.set {
            if field != ID_FIELD {
                doc.insert(field.clone(), value.clone());
            }
        }
    }

    /// Build the document an upsert inserts when nothing matched:
    /// `{_id} ∪ $setOnInsert ∪ $set`, later halves winning.
    pub fn upsert_document(&self, filter: &Filter) -> Document {
        let mut doc = Document::new();
        let id = filter
            .get(ID_FIELD)
            .map(value_as_key)
            .unwrap_or_else(generate_entity_id);
        doc.insert(ID_FIELD.to_string(), Value::String(id));
        for (field, value) in self.set_on_insert.iter().chain(self.set.iter()) {
            if field != ID_FIELD {
                doc.insert(field.clone(), value.clone());
            }
        }
        doc
    }
}

/// One operation of a `bulk_write` batch.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOne {
    pub filter: Filter,
    pub update: Update,
    pub upsert: bool,
}

// =============================================================================
// Operation results
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOneResult {
    pub inserted_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkWriteResult {
    pub matched_count: u64,
    pub upserted_count: u64,
}

// =============================================================================
// Aggregation
// =============================================================================

/// The one aggregation shape the stores understand:
///
/// ```json
/// [{ "$group": { "_id": "$listId", "items": { "$push": { "id": "$_id", "text": "$text" } } } }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPush {
    /// Field the documents are grouped by.
    pub group_by: String,
    /// Name of the pushed array in each summary.
    pub output: String,
    /// `(output key, source field)` pairs projected into the array.
    pub projection: Vec<(String, String)>,
}

impl GroupPush {
    /// Recognize a pipeline. Any other shape yields `None`.
    pub fn parse(pipeline: &[Value]) -> Option<Self> {
        let [stage] = pipeline else {
            return None;
        };
        let group = stage.as_object()?;
        if group.len() != 1 {
            return None;
        }
        let spec = group.get("$group")?.as_object()?;
        if spec.len() != 2 {
            return None;
        }
        let group_by = field_ref(spec.get(ID_FIELD)?)?;

        let (output, accumulator) = spec.iter().find(|(key, _)| key.as_str() != ID_FIELD)?;
        let accumulator = accumulator.as_object()?;
        if accumulator.len() != 1 {
            return None;
        }
        let pushed = accumulator.get("$push")?.as_object()?;
        let projection = pushed
            .iter()
            .map(|(key, source)| field_ref(source).map(|field| (key.clone(), field)))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            group_by,
            output: output.clone(),
            projection,
        })
    }

    /// Render back to pipeline form.
    pub fn to_pipeline(&self) -> Vec<Value> {
        let pushed: Map<String, Value> = self
            .projection
            .iter()
            .map(|(key, field)| (key.clone(), Value::String(format!("${field}"))))
            .collect();
        let mut group = Map::new();
        group.insert(
            ID_FIELD.to_string(),
            Value::String(format!("${}", self.group_by)),
        );
        group.insert(
            self.output.clone(),
            serde_json::json!({ "$push": Value::Object(pushed) }),
        );
        vec![serde_json::json!({ "$group": Value::Object(group) })]
    }

    /// Group documents (given in storage order). Groups appear in first-seen
    /// order and each pushed array keeps storage order.
    pub fn apply<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut groups: Vec<(Value, Vec<Value>)> = Vec::new();
        for doc in docs {
            let key = doc.get(&self.group_by).cloned().unwrap_or(Value::Null);
            let projected: Map<String, Value> = self
                .projection
                .iter()
                .map(|(out, field)| (out.clone(), doc.get(field).cloned().unwrap_or(Value::Null)))
                .collect();
            match groups.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, pushed)) => pushed.push(Value::Object(projected)),
                None => groups.push((key, vec![Value::Object(projected)])),
            }
        }

        groups
            .into_iter()
            .map(|(key, pushed)| {
                let mut summary = Document::new();
                summary.insert(ID_FIELD.to_string(), key);
                summary.insert(self.output.clone(), Value::Array(pushed));
                summary
            })
            .collect()
    }
}

fn field_ref(value: &Value) -> Option<String> {
    let field = value.as_str()?.strip_prefix('$')?;
    (field == ID_FIELD || is_plain_field(field)).then(|| field.to_string())
}
