use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::vectordb::{
    EqualityFilter, RoutePoint, ScoredMatch, VectorDbError, VectorIndex, VectorStore,
};

/// Parameters of the most recent search, for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    pub collection: String,
    pub query: Vec<f32>,
    pub limit: u64,
    pub filter: Option<EqualityFilter>,
}

/// In-memory vector index.
///
/// Either searches stored points by cosine similarity or, once
/// [`MockVectorIndex::with_fixed_results`] is used, replays a fixed match list.
#[derive(Default)]
pub struct MockVectorIndex {
    collections: RwLock<HashMap<String, MockCollection>>,
    fixed_results: Mutex<Option<Vec<ScoredMatch>>>,
    last_search: Mutex<Option<SearchRecord>>,
    search_calls: AtomicUsize,
    failing: AtomicBool,
    unhealthy: AtomicBool,
    latency: Option<Duration>,
}

#[derive(Default, Clone)]
struct MockCollection {
    vector_size: u64,
    points: Vec<RoutePoint>,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every search returns `results` (after filtering and truncation to `limit`).
    pub fn with_fixed_results(results: Vec<ScoredMatch>) -> Self {
        let index = Self::default();
        *index.fixed_results.lock() = Some(results);
        index
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.unhealthy.store(!healthy, Ordering::SeqCst);
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn last_search(&self) -> Option<SearchRecord> {
        self.last_search.lock().clone()
    }

    /// Number of stored points, or `None` if the collection does not exist.
    pub fn stored_points(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
    }

    /// Creates `name` if missing (test setup helper).
    pub fn ensure_collection(&self, name: &str, vector_size: u64) {
        self.collections
            .write()
            .entry(name.to_string())
            .or_insert(MockCollection {
                vector_size,
                points: Vec::new(),
            });
    }

    fn search_stored(
        &self,
        collection: &str,
        query: &[f32],
        filter: Option<&EqualityFilter>,
    ) -> Result<Vec<ScoredMatch>, VectorDbError> {
        let collections = self.collections.read();

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        if query.len() as u64 != coll.vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: coll.vector_size as usize,
                actual: query.len(),
            });
        }

        Ok(coll
            .points
            .iter()
            .filter(|p| filter.is_none_or(|f| f.matches(&p.payload)))
            .map(|p| ScoredMatch {
                id: p.id.clone(),
                score: cosine_similarity(query, &p.vector),
                payload: p.payload.clone(),
            })
            .collect())
    }
}

impl VectorIndex for MockVectorIndex {
    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
        filter: Option<&EqualityFilter>,
    ) -> Result<Vec<ScoredMatch>, VectorDbError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_search.lock() = Some(SearchRecord {
            collection: collection.to_string(),
            query: query.clone(),
            limit,
            filter: filter.cloned(),
        });

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "mock index configured to fail".to_string(),
            });
        }

        let fixed = self.fixed_results.lock().clone();
        let mut results = match fixed {
            Some(results) => results
                .into_iter()
                .filter(|m| filter.is_none_or(|f| f.matches(&m.payload)))
                .collect(),
            None => {
                let mut results = self.search_stored(collection, &query, filter)?;
                // Stable sort keeps insertion order among equal scores.
                results.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                results
            }
        };

        results.truncate(limit as usize);
        Ok(results)
    }

    async fn health_check(&self) -> Result<(), VectorDbError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(VectorDbError::ConnectionFailed {
                url: "mock://qdrant".to_string(),
                message: "mock index configured as unhealthy".to_string(),
            });
        }
        Ok(())
    }
}

impl VectorStore for MockVectorIndex {
    async fn recreate_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        self.collections.write().insert(
            name.to_string(),
            MockCollection {
                vector_size,
                points: Vec::new(),
            },
        );

        Ok(())
    }

    async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<RoutePoint>,
    ) -> Result<(), VectorDbError> {
        let mut collections = self.collections.write();

        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        for point in points {
            if point.vector.len() as u64 != coll.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: point.vector.len(),
                });
            }

            match coll.points.iter_mut().find(|p| p.id == point.id) {
                Some(existing) => *existing = point,
                None => coll.points.push(point),
            }
        }

        Ok(())
    }

    async fn point_count(&self, collection: &str) -> Result<Option<u64>, VectorDbError> {
        Ok(self.stored_points(collection).map(|n| n as u64))
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
