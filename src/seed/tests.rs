use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use super::*;
use crate::embedding::MockEmbedder;
use crate::vectordb::{MockVectorIndex, VectorIndex};

const COLLECTION: &str = "llm_routes";

fn routes() -> RoutesFile {
    RoutesFile {
        routes: vec![
            RouteDefinition::new("billing", "gpt-4o")
                .with_provider("openai")
                .with_metadata("tier", "pro")
                .with_utterance("refund my invoice")
                .with_utterance("I was charged twice"),
            RouteDefinition::new("code", "claude-sonnet")
                .with_utterance("write a rust function"),
        ],
    }
}

fn seeder(
    embedder: MockEmbedder,
) -> (RouteSeeder<MockEmbedder, MockVectorIndex>, Arc<MockVectorIndex>) {
    let store = Arc::new(MockVectorIndex::new());
    let seeder = RouteSeeder::new(Arc::new(embedder), Arc::clone(&store), COLLECTION);
    (seeder, store)
}

fn write_routes(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_routes_file_parses_optional_fields() {
    let file = write_routes(
        r#"{
            "routes": [
                {"name": "billing", "model": "gpt-4o", "utterances": ["refund"]},
                {"name": "code", "model": "m", "provider": "anthropic",
                 "metadata": {"tier": "pro"}, "utterances": []}
            ]
        }"#,
    );

    let parsed = RoutesFile::load(file.path()).unwrap();
    assert_eq!(parsed.routes.len(), 2);
    assert_eq!(parsed.routes[0].provider(), "unknown");
    assert!(parsed.routes[0].metadata.is_empty());
    assert_eq!(parsed.routes[1].provider(), "anthropic");
    assert_eq!(parsed.routes[1].metadata["tier"], "pro");
}

#[test]
fn test_routes_file_missing() {
    let err = RoutesFile::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, SeedError::Io { .. }));
}

#[test]
fn test_routes_file_malformed() {
    let file = write_routes("{ not json");
    let err = RoutesFile::load(file.path()).unwrap_err();
    assert!(matches!(err, SeedError::Parse { .. }));
}

#[test]
fn test_validate_rejects_empty_routes() {
    assert!(matches!(
        RoutesFile::default().validate(),
        Err(SeedError::NoRoutes)
    ));
}

#[test]
fn test_validate_rejects_reserved_metadata() {
    let def = RouteDefinition::new("billing", "gpt-4o").with_metadata("route", "other");
    match def.validate() {
        Err(SeedError::InvalidRoute { route, reason }) => {
            assert_eq!(route, "billing");
            assert!(reason.contains("route"));
        }
        other => panic!("expected invalid route, got {other:?}"),
    }

    let def = RouteDefinition::new("billing", "gpt-4o").with_metadata("provider", "x");
    assert!(def.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_model() {
    assert!(RouteDefinition::new("billing", "").validate().is_err());
    assert!(RouteDefinition::new("", "gpt-4o").validate().is_err());
}

#[tokio::test]
async fn test_seed_writes_one_point_per_utterance() {
    let (seeder, store) = seeder(MockEmbedder::new(16));

    let report = seeder.seed(&routes()).await.unwrap();

    assert_eq!(report.routes, 2);
    assert_eq!(report.points, 3);
    assert_eq!(report.dimension, 16);
    assert_eq!(report.stored_points, Some(3));
    assert_eq!(store.stored_points(COLLECTION), Some(3));
}

#[tokio::test]
async fn test_seed_payload_fields() {
    let embedder = MockEmbedder::new(16);
    let query = embedder.vector_for("refund my invoice");
    let (seeder, store) = seeder(embedder);
    seeder.seed(&routes()).await.unwrap();

    let results = store.search(COLLECTION, query, 1, None).await.unwrap();
    let top = &results[0];

    assert_eq!(top.route(), Some("billing"));
    assert_eq!(top.model(), Some("gpt-4o"));
    assert_eq!(top.payload["provider"], "openai");
    assert_eq!(top.payload["utterance"], "refund my invoice");
    assert_eq!(top.payload["tier"], "pro");
    assert!(uuid::Uuid::parse_str(&top.id).is_ok());
}

#[tokio::test]
async fn test_seed_defaults_provider() {
    let embedder = MockEmbedder::new(16);
    let query = embedder.vector_for("write a rust function");
    let (seeder, store) = seeder(embedder);
    seeder.seed(&routes()).await.unwrap();

    let results = store.search(COLLECTION, query, 1, None).await.unwrap();
    assert_eq!(results[0].route(), Some("code"));
    assert_eq!(results[0].payload["provider"], "unknown");
}

#[tokio::test]
async fn test_seed_replaces_existing_collection() {
    let (seeder, store) = seeder(MockEmbedder::new(16));

    seeder.seed(&routes()).await.unwrap();
    seeder.seed(&routes()).await.unwrap();

    assert_eq!(store.stored_points(COLLECTION), Some(3));
}

#[tokio::test]
async fn test_seed_invalid_routes_leave_store_untouched() {
    let (seeder, store) = seeder(MockEmbedder::new(16));

    let err = seeder.seed(&RoutesFile::default()).await.unwrap_err();
    assert!(matches!(err, SeedError::NoRoutes));
    assert_eq!(store.stored_points(COLLECTION), None);
}

#[tokio::test]
async fn test_seed_embedding_failure() {
    let (seeder, _store) = seeder(MockEmbedder::failing());

    let err = seeder.seed(&routes()).await.unwrap_err();
    assert!(matches!(err, SeedError::Embedding(_)));
}

#[tokio::test]
async fn test_seed_embedding_failure_keeps_existing_collection() {
    let store = Arc::new(MockVectorIndex::new());
    let healthy = RouteSeeder::new(Arc::new(MockEmbedder::new(16)), Arc::clone(&store), COLLECTION);
    healthy.seed(&routes()).await.unwrap();
    assert_eq!(store.stored_points(COLLECTION), Some(3));

    let broken = RouteSeeder::new(
        Arc::new(MockEmbedder::new(16).failing_on("write a rust function")),
        Arc::clone(&store),
        COLLECTION,
    );
    let err = broken.seed(&routes()).await.unwrap_err();

    assert!(matches!(err, SeedError::Embedding(_)));
    assert_eq!(store.stored_points(COLLECTION), Some(3));
}

#[tokio::test]
async fn test_seed_embedding_failure_creates_nothing() {
    let (seeder, store) = seeder(MockEmbedder::new(16).failing_on("I was charged twice"));

    assert!(seeder.seed(&routes()).await.is_err());
    assert_eq!(store.stored_points(COLLECTION), None);
}

#[tokio::test]
async fn test_seed_skips_routes_without_utterances() {
    let (seeder, store) = seeder(MockEmbedder::new(16));
    let file = RoutesFile {
        routes: vec![
            RouteDefinition::new("empty", "m"),
            RouteDefinition::new("one", "m").with_utterance("hello"),
        ],
    };

    let report = seeder.seed(&file).await.unwrap();
    assert_eq!(report.routes, 2);
    assert_eq!(report.points, 1);
    assert_eq!(store.stored_points(COLLECTION), Some(1));
}

#[tokio::test]
async fn test_seed_file_end_to_end() {
    let file = write_routes(
        r#"{"routes": [{"name": "support", "model": "m", "utterances": ["reset password", "login broken"]}]}"#,
    );
    let (seeder, _store) = seeder(MockEmbedder::new(8));

    let report = seeder.seed_file(file.path()).await.unwrap();
    assert_eq!(report.points, 2);
    assert_eq!(seeder.collection(), COLLECTION);
}
