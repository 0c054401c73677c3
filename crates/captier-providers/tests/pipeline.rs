//! Full cycle against in-memory backends: inventory → tiering → reconcile.

use std::sync::Arc;

use captier_core::{
    AutoScalingGroup, EvalConfig, TemplateRef, PRIORITIES_KEY, PRIORITY_EXPANDER_NAME,
};
use captier_engine::TieringEngine;
use captier_providers::{MemoryInventory, MemoryStore};
use captier_reconcile::{ReconcileOutcome, Reconciler};

fn fleet() -> Arc<MemoryInventory> {
    let inv = MemoryInventory::new();
    for (name, template, subnets) in [
        ("asg-a", "lt-a", vec![("s1", 5u64)]),
        ("asg-b", "lt-b", vec![("s2", 5), ("s3", 3)]),
        ("asg-c", "lt-c", vec![("s4", 10)]),
    ] {
        inv.insert_group(AutoScalingGroup {
            name: name.to_string(),
            template: TemplateRef::Direct {
                name: template.to_string(),
            },
            subnet_ids: subnets.iter().map(|(id, _)| id.to_string()).collect(),
        });
        for (id, free) in subnets {
            inv.insert_subnet(id, free);
        }
    }
    Arc::new(inv)
}

#[tokio::test]
async fn evaluate_and_publish_a_cycle() {
    let inventory = fleet();
    let engine = TieringEngine::new(inventory.clone(), inventory);
    let store = Arc::new(MemoryStore::new());
    let reconciler = Reconciler::new(store.clone(), false);

    let cfg = EvalConfig {
        include_catch_all: true,
        ..EvalConfig::default()
    };
    let eval = engine.evaluate(&cfg).await.unwrap();
    let outcome = reconciler
        .reconcile(
            "kube-system",
            PRIORITY_EXPANDER_NAME,
            eval.listing.into_payload(),
        )
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Created);
    let artifact = store.artifact("kube-system", PRIORITY_EXPANDER_NAME).unwrap();
    assert_eq!(
        artifact.data.get(PRIORITIES_KEY).map(String::as_str),
        Some("10:\n  - asg-c\n8:\n  - asg-b\n5:\n  - asg-a\n1:\n  - .*\n")
    );
}

#[tokio::test]
async fn second_cycle_updates_idempotently() {
    let inventory = fleet();
    let engine = TieringEngine::new(inventory.clone(), inventory);
    let store = Arc::new(MemoryStore::new());
    let reconciler = Reconciler::new(store.clone(), false);
    let cfg = EvalConfig::default();

    let first = engine.evaluate(&cfg).await.unwrap();
    reconciler
        .reconcile("ns", PRIORITY_EXPANDER_NAME, first.listing.into_payload())
        .await
        .unwrap();
    let after_first = store.artifact("ns", PRIORITY_EXPANDER_NAME).unwrap();

    let second = engine.evaluate(&cfg).await.unwrap();
    let outcome = reconciler
        .reconcile("ns", PRIORITY_EXPANDER_NAME, second.listing.into_payload())
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Updated);
    assert_eq!(store.artifact("ns", PRIORITY_EXPANDER_NAME).unwrap(), after_first);
}

#[tokio::test]
async fn skip_creation_reports_without_writing() {
    let inventory = fleet();
    let engine = TieringEngine::new(inventory.clone(), inventory);
    let store = Arc::new(MemoryStore::new());
    let reconciler = Reconciler::new(store.clone(), true);

    let eval = engine.evaluate(&EvalConfig::default()).await.unwrap();
    let outcome = reconciler
        .reconcile("ns", PRIORITY_EXPANDER_NAME, eval.listing.into_payload())
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::SkippedCreation);
    assert!(store.artifact("ns", PRIORITY_EXPANDER_NAME).is_none());
}
