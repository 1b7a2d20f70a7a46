use criterion::{Criterion, criterion_group, criterion_main};
use record_store::{
    Collection, InMemoryRecordStore, Record, RecordQuery, RecordStore, RecordStoreExt, Transaction,
};

fn rod(i: usize) -> Record {
    Record::new(
        Collection::Rods,
        format!("rod-{i}"),
        serde_json::json!({ "diameter": 12.0, "weight": 5.0 }),
    )
}

fn bench_insert_single(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("record_store/insert_single", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryRecordStore::new();
                store.insert(rod(0)).await.unwrap();
            });
        });
    });
}

fn bench_commit_batch_10(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("record_store/commit_batch_10", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryRecordStore::new();
                let tx = (0..10).fold(Transaction::new(), |tx, i| tx.insert(rod(i)));
                store.commit(tx).await.unwrap();
            });
        });
    });
}

fn bench_get_all_1000(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryRecordStore::new();
    rt.block_on(async {
        let records = (0..1000).map(rod).collect();
        store.replace_all(Collection::Rods, records).await.unwrap();
    });

    c.bench_function("record_store/get_all_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                let all = store.get_all(Collection::Rods).await.unwrap();
                assert_eq!(all.len(), 1000);
            });
        });
    });
}

fn bench_query_by_process(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryRecordStore::new();
    rt.block_on(async {
        let records = (0..1000)
            .map(|i| {
                Record::new(Collection::FinishedGoods, format!("f-{i}"), serde_json::json!({}))
                    .with_process_id(format!("p-{}", i % 10))
            })
            .collect();
        store
            .replace_all(Collection::FinishedGoods, records)
            .await
            .unwrap();
    });

    c.bench_function("record_store/query_by_process", |b| {
        b.iter(|| {
            rt.block_on(async {
                let found = store
                    .query(RecordQuery::new(Collection::FinishedGoods).process_id("p-3"))
                    .await
                    .unwrap();
                assert_eq!(found.len(), 100);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_insert_single,
    bench_commit_batch_10,
    bench_get_all_1000,
    bench_query_by_process,
);
criterion_main!(benches);
