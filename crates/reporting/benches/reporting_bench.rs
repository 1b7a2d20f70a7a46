use common::{Diameter, Weight};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{DepositStock, FinalizeProcess, InventoryService, NewProcess, ProcessOutputs};
use record_store::InMemoryRecordStore;
use reporting::{ReportFilter, ReportKind, Reporter};

fn mm(v: f64) -> Diameter {
    Diameter::from_mm(v).unwrap()
}

fn kg(v: f64) -> Weight {
    Weight::from_kg(v).unwrap()
}

/// A store with 50 finalized processes.
fn populated(rt: &tokio::runtime::Runtime) -> Reporter<InMemoryRecordStore> {
    let store = InMemoryRecordStore::new();
    let service = InventoryService::new(store.clone());

    rt.block_on(async {
        service
            .deposit(DepositStock::new(mm(12.0), kg(1000.0)))
            .await
            .unwrap();
        for i in 0..50 {
            let process = service
                .create_process(NewProcess::new(
                    format!("Batch {i}"),
                    mm(12.0),
                    kg(10.0),
                    mm(3.0),
                    8,
                ))
                .await
                .unwrap();
            let outputs = ProcessOutputs::new()
                .finished(8, kg(1.0))
                .rejected(1, kg(0.5), "crack")
                .weight_loss(kg(0.5));
            service
                .finalize(FinalizeProcess::new(&process.id, outputs))
                .await
                .unwrap();
        }
    });

    Reporter::new(store)
}

fn bench_stock_stats(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let reporter = populated(&rt);

    c.bench_function("reporting/stock_stats", |b| {
        b.iter(|| rt.block_on(async { reporter.stock_stats().await.unwrap() }));
    });
}

fn bench_process_details(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let reporter = populated(&rt);

    c.bench_function("reporting/process_details_50", |b| {
        b.iter(|| {
            rt.block_on(async {
                reporter
                    .report(ReportKind::ProcessDetails, &ReportFilter::All)
                    .await
                    .unwrap()
            })
        });
    });
}

fn bench_output_listings(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let reporter = populated(&rt);
    let filter = ReportFilter::Process("missing".into());

    c.bench_function("reporting/finished_goods_filtered", |b| {
        b.iter(|| {
            rt.block_on(async {
                reporter
                    .report(ReportKind::FinishedGoods, &filter)
                    .await
                    .unwrap()
            })
        });
    });
}

criterion_group!(benches, bench_stock_stats, bench_process_details, bench_output_listings);
criterion_main!(benches);
