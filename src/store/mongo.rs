//! MongoDB record store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BridgeError, Result};
use crate::models::{NewRecord, Record, RecordId};
use crate::store::RecordStore;

const USERS_COLLECTION: &str = "users";

impl From<mongodb::error::Error> for BridgeError {
    fn from(err: mongodb::error::Error) -> Self {
        BridgeError::StoreUnavailable(err.to_string())
    }
}

/// Stored shape of a record: the identifier lives in `_id`.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
}

impl From<UserDocument> for Record {
    fn from(doc: UserDocument) -> Self {
        Record {
            id: RecordId::from(doc.id),
            name: doc.name,
            email: doc.email,
        }
    }
}

/// Record store backed by the `users` collection of a MongoDB database.
#[derive(Clone)]
pub struct MongoRecordStore {
    client: Client,
    users: Collection<UserDocument>,
}

impl MongoRecordStore {
    /// Connects to `uri` and verifies the database answers a ping.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        info!(database = %database, "Connected to MongoDB");

        Ok(Self {
            users: db.collection(USERS_COLLECTION),
            client,
        })
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn insert(&self, record: NewRecord) -> Result<Record> {
        let result = self
            .users
            .clone_with_type::<NewRecord>()
            .insert_one(&record)
            .await?;

        let oid = result.inserted_id.as_object_id().ok_or_else(|| {
            BridgeError::StoreUnavailable("inserted id is not an ObjectId".to_string())
        })?;
        Ok(record.with_id(RecordId::from(oid)))
    }

    async fn find(&self, id: &RecordId) -> Result<Option<Record>> {
        let found = self
            .users
            .find_one(doc! { "_id": id.as_object_id() })
            .await?;
        Ok(found.map(Record::from))
    }

    async fn list(&self) -> Result<Vec<Record>> {
        let docs: Vec<UserDocument> = self.users.find(doc! {}).await?.try_collect().await?;
        Ok(docs.into_iter().map(Record::from).collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.count_documents(doc! {}).await?)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }
}
