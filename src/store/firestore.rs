use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Map, Value, json};

use super::{NoteStore, SnapshotStream, StoreError};
use crate::core::note::{Note, NoteDraft, NoteId, NotePatch};

const API_ROOT: &str = "https://firestore.googleapis.com/v1";

/// One row of a `runQuery` response. Rows without a document only carry a read time.
#[derive(Debug, Deserialize)]
struct QueryRow {
    document: Option<Document>,
}

/// A document resource as returned by the REST API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
    create_time: Option<DateTime<Utc>>,
    update_time: Option<DateTime<Utc>>,
}

/// Firestore's typed value wrapper. Only the kinds a note uses are kept.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum FieldValue {
    StringValue(String),
    BooleanValue(bool),
    TimestampValue(DateTime<Utc>),
    ArrayValue(ArrayValue),
    NullValue(IgnoredAny),
    IntegerValue(IgnoredAny),
    DoubleValue(IgnoredAny),
    BytesValue(IgnoredAny),
    ReferenceValue(IgnoredAny),
    GeoPointValue(IgnoredAny),
    MapValue(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct ArrayValue {
    #[serde(default)]
    values: Vec<FieldValue>,
}

/// Cloud Firestore collection accessed over the REST API.
///
/// Writes go through `documents:commit` so `createdAt`/`updatedAt` can be set to the
/// server's request time. Live updates are produced by polling the ordered query.
#[derive(Clone)]
pub struct FirestoreStore {
    http: Client,
    /// `projects/{project}/databases/(default)`
    database: String,
    collection: String,
    api_key: Option<String>,
    poll_interval: Duration,
}

impl FirestoreStore {
    pub fn new(
        project: &str,
        collection: &str,
        api_key: Option<String>,
        poll_interval: Duration,
    ) -> Result<Self, StoreError> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            database: format!("projects/{}/databases/(default)", project),
            collection: collection.to_string(),
            api_key,
            poll_interval,
        })
    }

    fn documents_url(&self) -> String {
        format!("{}/{}/documents", API_ROOT, self.database)
    }

    fn document_name(&self, id: &NoteId) -> String {
        format!("{}/documents/{}/{}", self.database, self.collection, id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.api_key {
            Some(ref key) => builder.query(&[("key", key)]),
            None => builder,
        }
    }

    fn query_body(&self) -> Value {
        json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "orderBy": [
                    { "field": { "fieldPath": "pinned" }, "direction": "DESCENDING" },
                    { "field": { "fieldPath": "updatedAt" }, "direction": "DESCENDING" },
                ],
            }
        })
    }

    /// Run the ordered collection query once.
    pub async fn fetch(&self) -> Result<Vec<Note>, StoreError> {
        let url = format!("{}:runQuery", self.documents_url());
        let resp = self
            .request(Method::POST, &url)
            .json(&self.query_body())
            .send()
            .await?;
        let rows: Vec<QueryRow> = check(resp).await?.json().await?;

        let mut notes = Vec::with_capacity(rows.len());
        for doc in rows.into_iter().filter_map(|r| r.document) {
            match document_to_note(&doc) {
                Ok(note) => notes.push(note),
                Err(e) => log::warn!("Skipping document: {}", e),
            }
        }
        Ok(notes)
    }

    fn create_write(&self, id: &NoteId, draft: &NoteDraft) -> Value {
        let mut fields = content_fields(&draft.title, &draft.body, &draft.tags);
        fields.insert("pinned".into(), json!({ "booleanValue": false }));
        json!({
            "update": { "name": self.document_name(id), "fields": fields },
            "updateTransforms": [
                { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" },
                { "fieldPath": "updatedAt", "setToServerValue": "REQUEST_TIME" },
            ],
            "currentDocument": { "exists": false },
        })
    }

    fn update_write(&self, id: &NoteId, patch: &NotePatch) -> Value {
        let mut fields = Map::new();
        if let Some(ref title) = patch.title {
            fields.insert("title".into(), string_value(title));
        }
        if let Some(ref body) = patch.body {
            fields.insert("body".into(), string_value(body));
        }
        if let Some(ref tags) = patch.tags {
            fields.insert("tags".into(), tags_value(tags));
        }
        if let Some(pinned) = patch.pinned {
            fields.insert("pinned".into(), json!({ "booleanValue": pinned }));
        }
        let mask: Vec<String> = fields.keys().cloned().collect();
        json!({
            "update": { "name": self.document_name(id), "fields": fields },
            "updateMask": { "fieldPaths": mask },
            "updateTransforms": [
                { "fieldPath": "updatedAt", "setToServerValue": "REQUEST_TIME" },
            ],
            "currentDocument": { "exists": true },
        })
    }

    async fn commit(&self, write: Value) -> Result<(), StoreError> {
        let url = format!("{}:commit", self.documents_url());
        let resp = self
            .request(Method::POST, &url)
            .json(&json!({ "writes": [write] }))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl NoteStore for FirestoreStore {
    fn subscribe(&self) -> SnapshotStream {
        struct Poll {
            store: FirestoreStore,
            last: Option<Vec<Note>>,
            first: bool,
        }

        let state = Poll {
            store: self.clone(),
            last: None,
            first: true,
        };

        futures::stream::unfold(state, |mut poll| async move {
            loop {
                if !poll.first {
                    tokio::time::sleep(poll.store.poll_interval).await;
                }
                poll.first = false;

                match poll.store.fetch().await {
                    Ok(notes) => {
                        if poll.last.as_ref() == Some(&notes) {
                            continue;
                        }
                        log::debug!("firestore: snapshot with {} notes", notes.len());
                        poll.last = Some(notes.clone());
                        return Some((Ok(notes), poll));
                    }
                    Err(e) => {
                        // Forget the last snapshot so recovery is always delivered.
                        poll.last = None;
                        return Some((Err(e), poll));
                    }
                }
            }
        })
        .boxed()
    }

    async fn add(&self, draft: NoteDraft) -> Result<NoteId, StoreError> {
        let id = NoteId::new(uuid::Uuid::new_v4().simple().to_string());
        self.commit(self.create_write(&id, &draft)).await?;
        log::debug!("firestore: created {}", id);
        Ok(id)
    }

    async fn update(&self, id: &NoteId, patch: NotePatch) -> Result<(), StoreError> {
        self.commit(self.update_write(id, &patch)).await?;
        log::debug!("firestore: updated {}", id);
        Ok(())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        let url = format!("{}/{}", API_ROOT, self.document_name(id));
        let resp = self.request(Method::DELETE, &url).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(()),
            _ => {
                check(resp).await?;
                log::debug!("firestore: deleted {}", id);
                Ok(())
            }
        }
    }
}

async fn check(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn tags_value(tags: &[String]) -> Value {
    let values: Vec<Value> = tags.iter().map(|t| string_value(t)).collect();
    json!({ "arrayValue": { "values": values } })
}

fn content_fields(title: &str, body: &str, tags: &[String]) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("title".into(), string_value(title));
    fields.insert("body".into(), string_value(body));
    fields.insert("tags".into(), tags_value(tags));
    fields
}

impl Document {
    fn string(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FieldValue::StringValue(s) => Some(s),
            _ => None,
        }
    }

    fn time(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.fields.get(key)? {
            FieldValue::TimestampValue(t) => Some(*t),
            _ => None,
        }
    }

    fn id(&self) -> Option<&str> {
        self.name.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// Map a Firestore document resource onto a note.
///
/// Missing timestamps fall back to the document's own create/update times.
fn document_to_note(doc: &Document) -> Result<Note, StoreError> {
    let id = doc
        .id()
        .ok_or_else(|| StoreError::Decode(format!("bad document name {}", doc.name)))?;

    let title = doc
        .string("title")
        .ok_or_else(|| StoreError::Decode(format!("{} has no title", id)))?;

    let tags = match doc.fields.get("tags") {
        Some(FieldValue::ArrayValue(array)) => array
            .values
            .iter()
            .filter_map(|v| match v {
                FieldValue::StringValue(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let pinned = matches!(doc.fields.get("pinned"), Some(FieldValue::BooleanValue(true)));

    let created_at = doc
        .time("createdAt")
        .or(doc.create_time)
        .ok_or_else(|| StoreError::Decode(format!("{} has no creation time", id)))?;
    let updated_at = doc
        .time("updatedAt")
        .or(doc.update_time)
        .unwrap_or(created_at);

    Ok(Note {
        id: NoteId::new(id),
        title: title.to_string(),
        body: doc.string("body").unwrap_or_default().to_string(),
        tags,
        pinned,
        created_at,
        updated_at,
    })
}
