use anyhow::Result;
use facematch::{pipeline, storage, Embedding, Identity, IdentityId};
use std::path::Path;

fn write(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)?;
    Ok(())
}

/// Registry with one canonical, one legacy and one broken identity.
const REGISTRY: &str = r#"[
    {"id": 101, "embedding": [0.0, 4.0, 0.0]},
    {"id": 102, "embeddings": [[3.0, 0.0, 0.0], [0.6, 0.8, 0.0]]},
    {"id": 103, "embeddings": []},
    {"id": "no-data"}
]"#;

#[test]
fn test_recognize_from_files() -> Result<()> {
    env_logger::try_init().ok();
    let dir = tempfile::tempdir()?;
    let registry = dir.path().join("registry.json");
    let detections = dir.path().join("faces.json");
    write(&registry, REGISTRY)?;
    write(
        &detections,
        "[[10.0, 0.0, 0.0], [0.0, 0.5, 0.05], [0.0, 0.0, 1.0]]",
    )?;

    let report = pipeline::recognize(&detections, &registry, 0.7)?;

    assert_eq!(report.total_faces_detected, 3);
    assert_eq!(report.candidates.len(), 2);
    assert_eq!(report.candidates[0].identity, IdentityId::Number(102));
    assert!((report.candidates[0].confidence - 1.0).abs() < 1e-5);
    assert_eq!(report.candidates[1].identity, IdentityId::Number(101));
    assert!(report.candidates[1].confidence > 0.99);

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["total_faces_detected"], 3);
    assert_eq!(json["candidates"][0]["identity"], 102);
    Ok(())
}

#[test]
fn test_recognize_rejects_bad_threshold() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let detections = dir.path().join("faces.json");
    write(&detections, "[]")?;

    assert!(pipeline::recognize(&detections, &dir.path().join("r.json"), 1.5).is_err());
    Ok(())
}

#[test]
fn test_no_faces() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let registry = dir.path().join("registry.json");
    let detections = dir.path().join("faces.json");
    write(&registry, REGISTRY)?;
    write(&detections, "[]")?;

    let report = pipeline::recognize(&detections, &registry, 0.65)?;
    assert!(report.candidates.is_empty());
    assert_eq!(report.total_faces_detected, 0);
    Ok(())
}

#[test]
fn test_aggregate_registry() -> Result<()> {
    env_logger::try_init().ok();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("registry.json");
    let output = dir.path().join("canonical.bin");
    write(&input, REGISTRY)?;

    let kept = pipeline::aggregate_registry(&input, &output)?;
    assert_eq!(kept, 2);

    let identities = storage::load_registry(&output)?;
    assert_eq!(identities.len(), 2);
    assert_eq!(
        identities[0],
        Identity::canonical(101, Embedding::new(vec![0.0, 4.0, 0.0]))
    );
    assert!(!identities.iter().any(|i| i.id == IdentityId::Number(103)));

    // Mean of [1,0,0] and [0.6,0.8,0], renormalized.
    let expected = Embedding::new(vec![0.894_427_2, 0.447_213_6, 0.0]);
    let record = storage::IdentityRecord::from(&identities[1]);
    let got = Embedding::new(record.embedding.expect("canonical embedding"));
    for (a, b) in got.vector.iter().zip(expected.vector.iter()) {
        assert!((a - b).abs() < 1e-5, "{got:?}");
    }
    Ok(())
}

/// Aggregating a registry must not lose anyone the matcher still recognizes.
#[test]
fn test_aggregate_keeps_partially_broken_identity() -> Result<()> {
    env_logger::try_init().ok();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("registry.json");
    let output = dir.path().join("canonical.json");
    let detections = dir.path().join("faces.json");
    write(
        &input,
        r#"[{"id": 7, "embeddings": [[1.0, 0.0], [], [0.0, 1.0, 0.0]]}]"#,
    )?;
    write(&detections, "[[1.0, 0.0]]")?;

    let before = pipeline::recognize(&detections, &input, 0.65)?;
    assert_eq!(before.candidates.len(), 1);
    assert_eq!(before.candidates[0].identity, IdentityId::Number(7));

    assert_eq!(pipeline::aggregate_registry(&input, &output)?, 1);

    let after = pipeline::recognize(&detections, &output, 0.65)?;
    assert_eq!(after.candidates, before.candidates);
    println!("✓ identity 7 survives aggregation: {:?}", after.candidates);
    Ok(())
}
