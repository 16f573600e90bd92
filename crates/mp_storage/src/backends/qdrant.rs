use async_trait::async_trait;
use mp_core::{ArticleStorage, Error, NormalizedArticle, PersistedArticle, Result};
use qdrant_client::{
    Qdrant,
    qdrant::{
        CreateCollection, Distance, PointId, PointStruct, ScrollPoints, UpsertPoints,
        Value, VectorParams, Vectors, VectorsConfig, WithPayloadSelector,
        vectors_config::Config,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;
use crate::backends::dedupe_by_url;
use crate::{BackendConfig, StorageBackend};

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
const SCROLL_PAGE: u32 = 256;

/// Points carry a one-dimensional placeholder vector; only the payload is
/// used.
pub struct QdrantStorage {
    client: Arc<Qdrant>,
    collection_name: String,
}

/// Deterministic point id, so saving the same URL twice overwrites.
pub fn point_id(url: &str) -> PointId {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes()).to_string().into()
}

fn to_point(article: &NormalizedArticle) -> Result<PointStruct> {
    let doc = serde_json::to_string(article)?;

    let mut payload: HashMap<String, Value> = HashMap::new();
    payload.insert("url".to_string(), article.url().to_string().into());
    payload.insert("doc".to_string(), doc.into());

    Ok(PointStruct {
        id: Some(point_id(article.url())),
        vectors: Some(Vectors::from(vec![0.0_f32])),
        payload,
    })
}

fn from_payload(payload: &HashMap<String, Value>) -> Option<PersistedArticle> {
    let doc = payload.get("doc").and_then(|v| v.as_str())?;
    match serde_json::from_str::<PersistedArticle>(doc) {
        Ok(article) => Some(article),
        Err(e) => {
            warn!("Skipping unreadable Qdrant point: {}", e);
            None
        }
    }
}

impl QdrantStorage {
    pub async fn new(url: &str, collection_name: String) -> Result<Self> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| Error::External(e.into()))?;
        let client = Arc::new(client);

        let collections = client
            .list_collections()
            .await
            .map_err(|e| Error::External(e.into()))?;

        if !collections.collections.iter().any(|c| c.name == collection_name) {
            let vector_config = VectorsConfig {
                config: Some(Config::Params(VectorParams {
                    size: 1,
                    distance: Distance::Dot.into(),
                    ..Default::default()
                })),
            };

            client
                .create_collection(CreateCollection {
                    collection_name: collection_name.clone(),
                    vectors_config: Some(vector_config),
                    ..Default::default()
                })
                .await
                .map_err(|e| Error::External(e.into()))?;
        }

        Ok(Self {
            client,
            collection_name,
        })
    }
}

#[async_trait]
impl StorageBackend for QdrantStorage {
    fn get_error_message() -> &'static str {
        "Qdrant should be reachable at QDRANT_URL (gRPC port, usually 6334)"
    }

    async fn open(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.get_url(DEFAULT_QDRANT_URL), config.get_collection()).await
    }
}

#[async_trait]
impl ArticleStorage for QdrantStorage {
    fn name(&self) -> &str {
        "qdrant"
    }

    async fn save(&self, articles: &[NormalizedArticle]) -> Result<()> {
        let points = dedupe_by_url(articles)
            .into_iter()
            .map(to_point)
            .collect::<Result<Vec<_>>>()?;
        if points.is_empty() {
            return Ok(());
        }

        self.client
            .upsert_points(UpsertPoints {
                collection_name: self.collection_name.clone(),
                points,
                wait: Some(true),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Storage(format!("Failed to upsert points: {}", e)))?;

        Ok(())
    }

    async fn load(&self) -> Result<Vec<PersistedArticle>> {
        let mut articles = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let page = self
                .client
                .scroll(ScrollPoints {
                    collection_name: self.collection_name.clone(),
                    offset: offset.take(),
                    limit: Some(SCROLL_PAGE),
                    with_payload: Some(WithPayloadSelector::from(true)),
                    ..Default::default()
                })
                .await
                .map_err(|e| Error::Storage(format!("Failed to scroll points: {}", e)))?;

            articles.extend(page.result.iter().filter_map(|point| from_payload(&point.payload)));

            match page.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(articles)
    }
}
