//! Builds reports from the record store.

use domain::entity::{load_all, load_one};
use domain::{DomainError, GroupError, Process, ProcessGroup, RodStockEntry};
use record_store::RecordStore;

use crate::error::Result;
use crate::filter::{ReportFilter, Scope};
use crate::report::{Report, ReportKind};
use crate::views::{
    FinishedGoodRow, NonConformingRow, Outputs, ProcessDetails, ProcessNames, RejectedRow,
    StockStats, WeightLossRow,
};

/// Read-only report builder.
///
/// Reports are computed from the stored records on every call.
#[derive(Clone)]
pub struct Reporter<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> Reporter<S> {
    /// Creates a new reporter over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stock grouped by diameter.
    #[tracing::instrument(skip(self))]
    pub async fn stock_stats(&self) -> Result<StockStats> {
        let entries: Vec<RodStockEntry> = load_all(&self.store).await?;
        Ok(StockStats::from_entries(&entries))
    }

    /// Resolves a filter, loading the group when one is named.
    pub async fn scope(&self, filter: &ReportFilter) -> Result<Scope> {
        Ok(match filter {
            ReportFilter::All => Scope::all(),
            ReportFilter::Process(id) => Scope::process(id.clone()),
            ReportFilter::Group(id) => {
                let group: ProcessGroup = load_one(&self.store, id)
                    .await?
                    .ok_or_else(|| DomainError::from(GroupError::GroupNotFound(id.clone())))?;
                Scope::group(&group)
            }
        })
    }

    async fn processes(&self) -> Result<Vec<Process>> {
        Ok(load_all(&self.store).await?)
    }

    /// Every process in scope joined with its outputs.
    #[tracing::instrument(skip(self))]
    pub async fn process_details(&self, filter: &ReportFilter) -> Result<Vec<ProcessDetails>> {
        let scope = self.scope(filter).await?;
        let processes = scope.retain(self.processes().await?, |p| p.id.as_str());

        let outputs = Outputs {
            finished_goods: load_all(&self.store).await?,
            non_conforming: load_all(&self.store).await?,
            rejected: load_all(&self.store).await?,
            weight_loss: load_all(&self.store).await?,
            summaries: load_all(&self.store).await?,
        };

        Ok(processes
            .iter()
            .map(|p| ProcessDetails::build(p, &outputs))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn finished_goods(&self, filter: &ReportFilter) -> Result<Vec<FinishedGoodRow>> {
        let scope = self.scope(filter).await?;
        let names = ProcessNames::new(&self.processes().await?);
        let items = scope.retain(load_all(&self.store).await?, |i: &domain::FinishedGood| {
            i.process_id.as_str()
        });
        Ok(items.iter().map(|i| FinishedGoodRow::new(i, &names)).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn non_conforming(&self, filter: &ReportFilter) -> Result<Vec<NonConformingRow>> {
        let scope = self.scope(filter).await?;
        let names = ProcessNames::new(&self.processes().await?);
        let items = scope.retain(
            load_all(&self.store).await?,
            |i: &domain::NonConformingItem| i.process_id.as_str(),
        );
        Ok(items.iter().map(|i| NonConformingRow::new(i, &names)).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn rejected(&self, filter: &ReportFilter) -> Result<Vec<RejectedRow>> {
        let scope = self.scope(filter).await?;
        let names = ProcessNames::new(&self.processes().await?);
        let items = scope.retain(load_all(&self.store).await?, |i: &domain::RejectedItem| {
            i.process_id.as_str()
        });
        Ok(items.iter().map(|i| RejectedRow::new(i, &names)).collect())
    }

    #[tracing::instrument(skip(self))]
    pub async fn weight_loss(&self, filter: &ReportFilter) -> Result<Vec<WeightLossRow>> {
        let scope = self.scope(filter).await?;
        let names = ProcessNames::new(&self.processes().await?);
        let items = scope.retain(load_all(&self.store).await?, |i: &domain::WeightLossItem| {
            i.process_id.as_str()
        });
        Ok(items.iter().map(|i| WeightLossRow::new(i, &names)).collect())
    }

    /// Builds a fixed-schema report of the given kind.
    #[tracing::instrument(skip(self))]
    pub async fn report(&self, kind: ReportKind, filter: &ReportFilter) -> Result<Report> {
        let report = match kind {
            ReportKind::ProcessDetails => {
                Report::from_rows(kind, &self.process_details(filter).await?)?
            }
            ReportKind::FinishedGoods => {
                Report::from_rows(kind, &self.finished_goods(filter).await?)?
            }
            ReportKind::NonConforming => {
                Report::from_rows(kind, &self.non_conforming(filter).await?)?
            }
            ReportKind::Rejected => Report::from_rows(kind, &self.rejected(filter).await?)?,
            ReportKind::WeightLoss => Report::from_rows(kind, &self.weight_loss(filter).await?)?,
        };

        metrics::counter!("reports_generated_total", "kind" => kind.as_str()).increment(1);
        tracing::debug!(%kind, rows = report.len(), "Report built");
        Ok(report)
    }
}
