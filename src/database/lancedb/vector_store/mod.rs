
use super::{ResumeMetadata, VectorHit, VectorRecord};
use crate::database::VectorIndex;
use crate::embeddings::DEFAULT_EMBEDDING_DIMENSION;
use crate::{VaultError, config::Config};
use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use lancedb::{
    Connection, DistanceType, Table,
    query::{ExecutableQuery, QueryBase},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Embedding store backed by LanceDB, one row per candidate
pub struct VectorStore {
    connection: Connection,
    table_name: String,
}

impl VectorStore {
    /// Opens (or creates) the vector database under the configured data directory.
    #[inline]
    pub async fn new(config: &Config) -> crate::Result<Self> {
        let db_path = config.vector_database_path();
        debug!("Initializing LanceDB at path: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VaultError::Store(format!("Failed to create vector database directory: {}", e))
            })?;
        }

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to connect to LanceDB: {}", e)))?;

        let store = Self {
            connection,
            table_name: "resumes".to_string(),
        };

        store.ensure_table(DEFAULT_EMBEDDING_DIMENSION).await?;

        info!("Vector store ready at {:?}", db_path);
        Ok(store)
    }

    /// Total number of stored embeddings.
    #[inline]
    pub async fn count(&self) -> crate::Result<u64> {
        let table = self.open_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| VaultError::Store(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    /// Ids of every stored embedding, in table order.
    #[inline]
    pub async fn ids(&self) -> crate::Result<Vec<String>> {
        let table = self.open_table().await?;
        let mut stream = table
            .query()
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to scan table: {}", e)))?;

        let mut ids = Vec::new();
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to read scan stream: {}", e)))?
        {
            let column = string_column(&batch, "id")?;
            for row in 0..batch.num_rows() {
                ids.push(column.value(row).to_string());
            }
        }

        Ok(ids)
    }

    /// Drops every stored embedding and recreates an empty table.
    #[inline]
    pub async fn wipe(&self) -> crate::Result<()> {
        self.drop_table_if_exists().await?;
        self.create_table(DEFAULT_EMBEDDING_DIMENSION).await?;

        info!("Cleared the {} table", self.table_name);
        Ok(())
    }

    /// Opens the table, creating it with the given dimension when missing.
    async fn ensure_table(&self, dimension: usize) -> crate::Result<Table> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to list tables: {}", e)))?;

        if table_names.contains(&self.table_name) {
            return self.open_table().await;
        }

        debug!(
            "Creating {} table with {} dimensions",
            self.table_name, dimension
        );
        self.create_table(dimension).await
    }

    /// Returns a table whose vector column matches `dimension`, rebuilding it
    /// when the stored dimension differs. Rebuilding discards existing rows.
    async fn table_for_dimension(&self, dimension: usize) -> crate::Result<Table> {
        let table = self.ensure_table(dimension).await?;
        let existing = Self::vector_dimension_of(&table).await?;
        if existing == dimension {
            return Ok(table);
        }

        warn!(
            "Vector dimension changed from {} to {}, rebuilding the {} table",
            existing, dimension, self.table_name
        );
        self.drop_table_if_exists().await?;
        self.create_table(dimension).await
    }

    async fn open_table(&self) -> crate::Result<Table> {
        self.connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to open table: {}", e)))
    }

    async fn create_table(&self, dimension: usize) -> crate::Result<Table> {
        self.connection
            .create_empty_table(&self.table_name, vector_schema(dimension))
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to create table: {}", e)))
    }

    async fn drop_table_if_exists(&self) -> crate::Result<()> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to list tables for drop: {}", e)))?;

        if table_names.contains(&self.table_name) {
            self.connection
                .drop_table(&self.table_name)
                .await
                .map_err(|e| VaultError::Store(format!("Failed to drop table: {}", e)))?;
        }

        Ok(())
    }

    /// Reads the vector dimension out of the table schema.
    async fn vector_dimension_of(table: &Table) -> crate::Result<usize> {
        let schema = table
            .schema()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to get table schema: {}", e)))?;

        for field in schema.fields() {
            if field.name() == "vector" {
                if let DataType::FixedSizeList(_, size) = field.data_type() {
                    return Ok(*size as usize);
                }
            }
        }

        Err(VaultError::Store(
            "Could not find vector column or determine dimension".to_string(),
        ))
    }

    /// Builds a one-row batch for `record`, deriving the schema from its vector.
    fn record_batch(record: &VectorRecord, created_at: &str) -> crate::Result<RecordBatch> {
        let dimension = record.vector.len();
        let schema = vector_schema(dimension);

        let values = Float32Array::from(record.vector.clone());
        let item_field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array =
            FixedSizeListArray::try_new(item_field, dimension as i32, Arc::new(values), None)
                .map_err(|e| VaultError::Store(format!("Failed to create vector array: {}", e)))?;

        let arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(vec![record.id.as_str()])),
            Arc::new(vector_array),
            Arc::new(StringArray::from(vec![record.metadata.name.as_str()])),
            Arc::new(StringArray::from(vec![record.metadata.email.as_str()])),
            Arc::new(StringArray::from(vec![record.metadata.raw_text.as_str()])),
            Arc::new(StringArray::from(vec![record.metadata.filename.as_deref()])),
            Arc::new(StringArray::from(vec![created_at])),
        ];

        RecordBatch::try_new(schema, arrays)
            .map_err(|e| VaultError::Store(format!("Failed to create record batch: {}", e)))
    }

    async fn collect_hits(
        mut results: lancedb::arrow::SendableRecordBatchStream,
        include_metadata: bool,
    ) -> crate::Result<Vec<VectorHit>> {
        let mut hits = Vec::new();

        while let Some(batch) = results
            .try_next()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to read result stream: {}", e)))?
        {
            hits.extend(Self::parse_hit_batch(&batch, include_metadata)?);
        }

        debug!("Parsed {} hits from result stream", hits.len());
        Ok(hits)
    }

    fn parse_hit_batch(
        batch: &RecordBatch,
        include_metadata: bool,
    ) -> crate::Result<Vec<VectorHit>> {
        let ids = string_column(batch, "id")?;

        let metadata_columns = if include_metadata {
            Some((
                string_column(batch, "name")?,
                string_column(batch, "email")?,
                string_column(batch, "raw_text")?,
                string_column(batch, "filename")?,
            ))
        } else {
            None
        };

        let distances = batch
            .column_by_name("_distance")
            .map(|col| col.as_any().downcast_ref::<Float32Array>());

        let mut hits = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let distance = distances
                .flatten()
                .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

            let metadata =
                metadata_columns.map(|(names, emails, raw_texts, filenames)| ResumeMetadata {
                    name: names.value(row).to_string(),
                    email: emails.value(row).to_string(),
                    raw_text: raw_texts.value(row).to_string(),
                    filename: if filenames.is_null(row) {
                        None
                    } else {
                        Some(filenames.value(row).to_string())
                    },
                });

            hits.push(VectorHit {
                id: ids.value(row).to_string(),
                similarity: 1.0 - distance,
                metadata,
            });
        }

        Ok(hits)
    }
}

#[async_trait]
impl VectorIndex for VectorStore {
    #[inline]
    async fn upsert(&self, mut record: VectorRecord) -> crate::Result<()> {
        if record.vector.is_empty() {
            return Err(VaultError::Store(
                "Cannot store an empty embedding".to_string(),
            ));
        }

        if record.metadata.clamp_to_limit() {
            warn!(
                "Metadata for {} was over the size limit, stored truncated resume text",
                record.id
            );
        }

        let table = self.table_for_dimension(record.vector.len()).await?;

        // One row per candidate id.
        let predicate = format!("id = '{}'", record.id);
        table
            .delete(&predicate)
            .await
            .map_err(|e| VaultError::Store(format!("Failed to clear previous record: {}", e)))?;

        let batch = Self::record_batch(&record, &Utc::now().to_rfc3339())?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to insert embedding: {}", e)))?;

        debug!("Stored embedding for record {}", record.id);
        Ok(())
    }

    #[inline]
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> crate::Result<Vec<VectorHit>> {
        debug!("Searching for nearest records with limit: {}", top_k);

        let table = self.open_table().await?;
        let stream = table
            .vector_search(vector)
            .map_err(|e| VaultError::Store(format!("Failed to build vector search: {}", e)))?
            .column("vector")
            .distance_type(DistanceType::Cosine)
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| VaultError::Store(format!("Failed to execute search: {}", e)))?;

        Self::collect_hits(stream, include_metadata).await
    }
}

/// Table schema shared by every record, vector width fixed per table
fn vector_schema(dimension: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, false)),
                dimension as i32,
            ),
            false,
        ),
        Field::new("name", DataType::Utf8, false),
        Field::new("email", DataType::Utf8, false),
        Field::new("raw_text", DataType::Utf8, false),
        Field::new("filename", DataType::Utf8, true),
        Field::new("created_at", DataType::Utf8, false),
    ]))
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> crate::Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| VaultError::Store(format!("Missing {} column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| VaultError::Store(format!("Invalid {} column type", name)))
}
