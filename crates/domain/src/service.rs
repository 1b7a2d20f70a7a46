//! Inventory service: every mutating operation is one atomic commit.

use common::{Diameter, Weight};
use record_store::{RecordStore, RecordStoreExt, Transaction, WriteOp};
use tokio::sync::Mutex;

use crate::commands::{CreateGroup, DepositStock, FinalizeProcess, UpdateGroup, WithdrawStock};
use crate::entity::{Entity, load_all, load_one};
use crate::error::DomainError;
use crate::group::{GroupError, ProcessGroup};
use crate::ledger::{
    CatalogEntry, CatalogKind, HistoryFilter, InventoryTransaction, LedgerError, LedgerEvent,
    ProcessTag, RodStockEntry, StockLedger,
};
use crate::process::{NewProcess, Process, ProcessError};
use crate::reconciliation::{OutputRecords, ProcessOutputs, Reconciliation, reconcile};
use crate::snapshot::InventorySnapshot;

/// Result of a deposit.
#[derive(Debug, Clone)]
pub struct DepositOutcome {
    pub entry: RodStockEntry,
    pub transaction: InventoryTransaction,
    /// Stock at the deposited diameter after the commit.
    pub available_weight: Weight,
}

/// Result of a withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawOutcome {
    pub transaction: InventoryTransaction,
    /// Ids of entries that were fully consumed and removed.
    pub consumed_entries: Vec<String>,
    pub available_weight: Weight,
}

/// Result of finalizing a process.
#[derive(Debug, Clone)]
pub struct FinalizeOutcome {
    pub process: Process,
    pub reconciliation: Reconciliation,
    pub records: OutputRecords,
}

/// Service for stock, processes, groups and snapshots.
///
/// Writers are serialised: each mutating operation takes the writer lock,
/// plans its writes against the current records and commits them as one
/// transaction. A failed commit leaves the store untouched.
pub struct InventoryService<S: RecordStore> {
    store: S,
    writer: Mutex<()>,
}

impl<S: RecordStore> InventoryService<S> {
    /// Creates a new service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn ledger(&self) -> Result<StockLedger, DomainError> {
        Ok(StockLedger::from_entries(load_all(&self.store).await?))
    }

    /// Returns an insert for the catalogue entry unless it is already known.
    async fn catalog_write(
        &self,
        kind: CatalogKind,
        diameter: Diameter,
    ) -> Result<Option<WriteOp>, DomainError> {
        let entry = CatalogEntry::new(diameter);
        if self.store.exists(kind.collection(), &entry.key()).await? {
            return Ok(None);
        }
        Ok(Some(WriteOp::Insert(entry.to_record(kind)?)))
    }

    // -- Stock ledger --

    /// Adds a batch of rods to stock and registers its diameter.
    #[tracing::instrument(skip(self))]
    pub async fn deposit(&self, cmd: DepositStock) -> Result<DepositOutcome, DomainError> {
        let _guard = self.writer.lock().await;

        let mut ledger = self.ledger().await?;
        let events = ledger.deposit(cmd.diameter, cmd.weight, cmd.length, None)?;

        let mut tx = events_to_transaction(&events)?;
        if let Some(op) = self.catalog_write(CatalogKind::Rod, cmd.diameter).await? {
            tx.push(op);
        }
        self.store.commit(tx).await?;
        ledger.apply_events(&events);

        let (entry, transaction) = match events.as_slice() {
            [
                LedgerEvent::EntryCreated(entry),
                LedgerEvent::TransactionRecorded(line),
            ] => (entry.clone(), line.clone()),
            _ => unreachable!("deposit always yields an entry and a history line"),
        };

        metrics::counter!("stock_deposits_total").increment(1);
        tracing::info!(
            entry_id = %entry.id,
            diameter = %cmd.diameter,
            weight = %cmd.weight,
            "Stock deposited"
        );

        Ok(DepositOutcome {
            entry,
            transaction,
            available_weight: ledger.available_weight(cmd.diameter),
        })
    }

    /// Takes weight out of stock, oldest entries first.
    #[tracing::instrument(skip(self))]
    pub async fn withdraw(&self, cmd: WithdrawStock) -> Result<WithdrawOutcome, DomainError> {
        let _guard = self.writer.lock().await;

        let mut ledger = self.ledger().await?;
        let tag = cmd.tag();
        let events = ledger.withdraw(cmd.diameter, cmd.weight, tag.as_ref())?;

        self.store.commit(events_to_transaction(&events)?).await?;
        ledger.apply_events(&events);
        record_withdrawal(cmd.weight);

        let mut consumed_entries = Vec::new();
        let mut transaction = None;
        for event in events {
            match event {
                LedgerEvent::EntryConsumed { id } => consumed_entries.push(id),
                LedgerEvent::TransactionRecorded(line) => transaction = Some(line),
                _ => {}
            }
        }
        let Some(transaction) = transaction else {
            unreachable!("withdraw always yields a history line");
        };

        tracing::info!(
            diameter = %cmd.diameter,
            weight = %cmd.weight,
            consumed = consumed_entries.len(),
            "Stock withdrawn"
        );

        Ok(WithdrawOutcome {
            transaction,
            consumed_entries,
            available_weight: ledger.available_weight(cmd.diameter),
        })
    }

    /// Returns the stock available at a diameter.
    #[tracing::instrument(skip(self))]
    pub async fn available_weight(&self, diameter: Diameter) -> Result<Weight, DomainError> {
        Ok(self.ledger().await?.available_weight(diameter))
    }

    /// Returns every stock entry in ledger order.
    pub async fn stock_entries(&self) -> Result<Vec<RodStockEntry>, DomainError> {
        load_all(&self.store).await
    }

    /// Returns history lines in insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn history(
        &self,
        filter: HistoryFilter,
    ) -> Result<Vec<InventoryTransaction>, DomainError> {
        let lines: Vec<InventoryTransaction> = load_all(&self.store).await?;
        Ok(lines.into_iter().filter(|l| filter.matches(l)).collect())
    }

    /// Registers a rod diameter. Returns false when it was already known.
    #[tracing::instrument(skip(self))]
    pub async fn register_diameter(&self, diameter: Diameter) -> Result<bool, DomainError> {
        self.register(CatalogKind::Rod, diameter).await
    }

    /// Registers a blade diameter. Returns false when it was already known.
    #[tracing::instrument(skip(self))]
    pub async fn register_blade_diameter(&self, diameter: Diameter) -> Result<bool, DomainError> {
        self.register(CatalogKind::Blade, diameter).await
    }

    async fn register(&self, kind: CatalogKind, diameter: Diameter) -> Result<bool, DomainError> {
        if !diameter.is_positive() {
            return Err(LedgerError::InvalidQuantity {
                field: "diameter",
                value: diameter.as_mm().to_string(),
            }
            .into());
        }

        let _guard = self.writer.lock().await;
        let Some(op) = self.catalog_write(kind, diameter).await? else {
            return Ok(false);
        };

        let mut tx = Transaction::new();
        tx.push(op);
        self.store.commit(tx).await?;
        tracing::info!(%diameter, collection = %kind.collection(), "Diameter registered");
        Ok(true)
    }

    /// Known rod diameters, ascending.
    pub async fn diameters(&self) -> Result<Vec<Diameter>, DomainError> {
        self.catalog(CatalogKind::Rod).await
    }

    /// Known blade diameters, ascending.
    pub async fn blade_diameters(&self) -> Result<Vec<Diameter>, DomainError> {
        self.catalog(CatalogKind::Blade).await
    }

    async fn catalog(&self, kind: CatalogKind) -> Result<Vec<Diameter>, DomainError> {
        let records = self.store.get_all(kind.collection()).await?;
        let entries = records
            .iter()
            .map(|r| r.decode::<CatalogEntry>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CatalogEntry::sorted(entries))
    }

    // -- Process lifecycle --

    /// Creates a process and reserves its weight from stock.
    #[tracing::instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_process(&self, input: NewProcess) -> Result<Process, DomainError> {
        let process = input.into_process()?;

        let _guard = self.writer.lock().await;

        let existing: Vec<Process> = load_all(&self.store).await?;
        if existing
            .iter()
            .any(|p| p.process_number == process.process_number)
        {
            return Err(
                ProcessError::DuplicateProcessNumber(process.process_number.to_string()).into(),
            );
        }

        let ledger = self.ledger().await?;
        let tag = process.tag();
        let events = ledger.withdraw(process.diameter, process.weight_used, Some(&tag))?;

        let mut tx = events_to_transaction(&events)?;
        tx.push(WriteOp::Insert(process.to_record()?));
        if let Some(op) = self
            .catalog_write(CatalogKind::Blade, process.blade_diameter)
            .await?
        {
            tx.push(op);
        }
        self.store.commit(tx).await?;

        record_withdrawal(process.weight_used);
        metrics::counter!("processes_created_total").increment(1);
        tracing::info!(
            process_id = %process.id,
            process_number = %process.process_number,
            diameter = %process.diameter,
            weight_used = %process.weight_used,
            "Process created"
        );

        Ok(process)
    }

    /// Loads a process by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_process(&self, process_id: &str) -> Result<Process, DomainError> {
        load_one(&self.store, process_id)
            .await?
            .ok_or_else(|| ProcessError::ProcessNotFound(process_id.to_string()).into())
    }

    /// Every process in creation order.
    pub async fn list_processes(&self) -> Result<Vec<Process>, DomainError> {
        load_all(&self.store).await
    }

    /// Processes still waiting to be finalized.
    pub async fn in_progress_processes(&self) -> Result<Vec<Process>, DomainError> {
        let processes = self.list_processes().await?;
        Ok(processes.into_iter().filter(Process::is_in_progress).collect())
    }

    /// Computes the reconciliation for a process without writing anything.
    #[tracing::instrument(skip(self, outputs))]
    pub async fn preview(
        &self,
        process_id: &str,
        outputs: &ProcessOutputs,
    ) -> Result<Reconciliation, DomainError> {
        let process = self.get_process(process_id).await?;
        Ok(reconcile(&process, outputs)?)
    }

    /// Records the outputs of a process and completes it.
    ///
    /// Output records, the summary, the optional leftover deposit and the
    /// status change are committed together.
    #[tracing::instrument(skip(self, cmd), fields(process_id = %cmd.process_id))]
    pub async fn finalize(&self, cmd: FinalizeProcess) -> Result<FinalizeOutcome, DomainError> {
        let _guard = self.writer.lock().await;

        let mut process = self.get_process(&cmd.process_id).await?;
        process.ensure_can_complete()?;

        let reconciliation = reconcile(&process, &cmd.outputs)?;
        let records = OutputRecords::build(
            &process,
            &cmd.outputs,
            &reconciliation,
            cmd.add_leftover_to_stock,
        );

        let mut tx = Transaction::new();
        for op in records.write_ops()? {
            tx.push(op);
        }

        if let Some(leftover) = &records.leftover {
            let ledger = self.ledger().await?;
            let tag: ProcessTag = process.tag();
            let events = ledger.deposit(leftover.diameter, leftover.weight, None, Some(&tag))?;
            tx.extend(events_to_transaction(&events)?);
        }

        process.complete()?;
        tx.push(WriteOp::Put(process.to_record()?));

        self.store.commit(tx).await?;

        metrics::counter!("processes_completed_total").increment(1);
        tracing::info!(
            process_id = %process.id,
            finished = %reconciliation.finished_weight,
            weight_loss = %reconciliation.weight_loss_weight,
            leftover = %reconciliation.leftover_weight,
            added_back_to_stock = records.leftover.is_some(),
            "Process finalized"
        );

        Ok(FinalizeOutcome {
            process,
            reconciliation,
            records,
        })
    }

    // -- Groups --

    /// Creates a process group.
    #[tracing::instrument(skip(self))]
    pub async fn create_group(&self, cmd: CreateGroup) -> Result<ProcessGroup, DomainError> {
        let group = ProcessGroup::new(&cmd.name, cmd.process_ids)?;

        let _guard = self.writer.lock().await;
        self.store.commit(Transaction::new().insert(group.to_record()?)).await?;

        tracing::info!(group_id = %group.id, members = group.process_ids.len(), "Group created");
        Ok(group)
    }

    /// Renames a group or replaces its members.
    #[tracing::instrument(skip(self))]
    pub async fn update_group(&self, cmd: UpdateGroup) -> Result<ProcessGroup, DomainError> {
        let _guard = self.writer.lock().await;

        let mut group = self.get_group(&cmd.group_id).await?;
        group.update(cmd.name.as_deref(), cmd.process_ids)?;
        self.store.commit(Transaction::new().put(group.to_record()?)).await?;

        tracing::info!(group_id = %group.id, "Group updated");
        Ok(group)
    }

    /// Deletes a group.
    #[tracing::instrument(skip(self))]
    pub async fn delete_group(&self, group_id: &str) -> Result<(), DomainError> {
        let _guard = self.writer.lock().await;

        let group = self.get_group(group_id).await?;
        self.store
            .commit(Transaction::new().delete(ProcessGroup::COLLECTION, group.key()))
            .await?;

        tracing::info!(group_id, "Group deleted");
        Ok(())
    }

    /// Loads a group by id.
    pub async fn get_group(&self, group_id: &str) -> Result<ProcessGroup, DomainError> {
        load_one(&self.store, group_id)
            .await?
            .ok_or_else(|| GroupError::GroupNotFound(group_id.to_string()).into())
    }

    /// Every group in creation order.
    pub async fn list_groups(&self) -> Result<Vec<ProcessGroup>, DomainError> {
        load_all(&self.store).await
    }

    // -- Snapshots --

    /// Reads every collection.
    #[tracing::instrument(skip(self))]
    pub async fn export(&self) -> Result<InventorySnapshot, DomainError> {
        InventorySnapshot::load(&self.store).await
    }

    /// Replaces every collection with the snapshot's contents.
    ///
    /// Returns the number of records imported.
    #[tracing::instrument(skip(self, snapshot))]
    pub async fn import(&self, snapshot: InventorySnapshot) -> Result<usize, DomainError> {
        if let Err(e) = snapshot.validate() {
            tracing::warn!(error = %e, "Snapshot rejected");
            return Err(e);
        }
        let tx = snapshot.to_transaction()?;

        let _guard = self.writer.lock().await;
        self.store.commit(tx).await?;

        let records = snapshot.record_count();
        tracing::info!(records, "Snapshot imported");
        Ok(records)
    }

    /// Parses a snapshot document and imports it.
    pub async fn import_json(&self, document: serde_json::Value) -> Result<usize, DomainError> {
        let snapshot: InventorySnapshot = serde_json::from_value(document).map_err(|e| {
            tracing::warn!(error = %e, "Snapshot rejected");
            DomainError::InvalidSnapshot(e.to_string())
        })?;
        self.import(snapshot).await
    }
}

fn events_to_transaction(events: &[LedgerEvent]) -> Result<Transaction, DomainError> {
    let mut tx = Transaction::new();
    for event in events {
        tx.push(event.to_write_op()?);
    }
    Ok(tx)
}

fn record_withdrawal(amount: Weight) {
    metrics::counter!("stock_withdrawals_total").increment(1);
    metrics::histogram!("stock_withdrawn_kg").record(amount.as_kg());
}
