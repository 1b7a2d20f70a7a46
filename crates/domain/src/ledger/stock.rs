use common::{Diameter, Weight};

use super::{InventoryTransaction, LedgerError, LedgerEvent, RodStockEntry, TransactionKind};

/// Process attribution for a history line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTag {
    pub process_id: String,
    pub process_name: String,
}

impl ProcessTag {
    pub fn new(process_id: impl Into<String>, process_name: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            process_name: process_name.into(),
        }
    }
}

/// The current set of rod stock entries, in ledger order.
///
/// Command methods (`deposit`, `withdraw`) validate against the current
/// entries and return the events that carry out the change; they never
/// mutate. `apply` folds an event into the ledger.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    entries: Vec<RodStockEntry>,
}

impl StockLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger from entries in their stored order.
    pub fn from_entries(entries: Vec<RodStockEntry>) -> Self {
        Self { entries }
    }

    /// Returns all entries.
    pub fn entries(&self) -> &[RodStockEntry] {
        &self.entries
    }

    /// Returns the entries of one diameter, in consumption order.
    pub fn entries_for(&self, diameter: Diameter) -> impl Iterator<Item = &RodStockEntry> {
        self.entries.iter().filter(move |e| e.diameter == diameter)
    }

    /// Sum of the weights of every entry with this diameter.
    pub fn available_weight(&self, diameter: Diameter) -> Weight {
        self.entries_for(diameter).map(|e| e.weight).sum()
    }

    /// Sum of the weights of every entry.
    pub fn total_weight(&self) -> Weight {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Distinct diameters currently in stock, ascending.
    pub fn diameters(&self) -> Vec<Diameter> {
        let mut diameters: Vec<_> = self.entries.iter().map(|e| e.diameter).collect();
        diameters.sort();
        diameters.dedup();
        diameters
    }

    // Commands

    /// Plans a deposit: one new entry plus one `in` history line.
    pub fn deposit(
        &self,
        diameter: Diameter,
        weight: Weight,
        length: Option<f64>,
        tag: Option<&ProcessTag>,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        if !diameter.is_positive() {
            return Err(LedgerError::InvalidQuantity {
                field: "diameter",
                value: diameter.as_mm().to_string(),
            });
        }
        if !weight.is_positive() {
            return Err(LedgerError::InvalidQuantity {
                field: "weight",
                value: weight.as_kg().to_string(),
            });
        }
        if let Some(l) = length
            && !(l.is_finite() && l > 0.0)
        {
            return Err(LedgerError::InvalidQuantity {
                field: "length",
                value: l.to_string(),
            });
        }

        let entry = RodStockEntry::new(diameter, weight, length);
        let line = InventoryTransaction::new(TransactionKind::In, diameter, weight, length, tag);

        Ok(vec![
            LedgerEvent::EntryCreated(entry),
            LedgerEvent::TransactionRecorded(line),
        ])
    }

    /// Plans a withdrawal.
    ///
    /// Entries of the diameter are consumed in ledger order: fully consumed
    /// entries are removed and the entry absorbing the remainder is reduced.
    /// Exactly one `out` history line is produced per call.
    pub fn withdraw(
        &self,
        diameter: Diameter,
        amount: Weight,
        tag: Option<&ProcessTag>,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidQuantity {
                field: "weight",
                value: amount.as_kg().to_string(),
            });
        }

        let available = self.available_weight(diameter);
        if amount > available {
            return Err(LedgerError::InsufficientStock {
                diameter,
                requested: amount,
                available,
            });
        }

        let mut events = Vec::new();
        let mut remaining = amount;
        for entry in self.entries_for(diameter) {
            if remaining.is_zero() {
                break;
            }
            if entry.weight <= remaining {
                remaining -= entry.weight;
                events.push(LedgerEvent::EntryConsumed {
                    id: entry.id.clone(),
                });
            } else {
                let mut reduced = entry.clone();
                reduced.weight -= remaining;
                remaining = Weight::zero();
                events.push(LedgerEvent::EntryReduced(reduced));
            }
        }

        events.push(LedgerEvent::TransactionRecorded(InventoryTransaction::new(
            TransactionKind::Out,
            diameter,
            amount,
            None,
            tag,
        )));

        Ok(events)
    }

    // Event application

    /// Applies an event to the ledger.
    pub fn apply(&mut self, event: &LedgerEvent) {
        match event {
            LedgerEvent::EntryCreated(entry) => self.entries.push(entry.clone()),
            LedgerEvent::EntryReduced(entry) => {
                if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
                    existing.weight = entry.weight;
                }
            }
            LedgerEvent::EntryConsumed { id } => self.entries.retain(|e| &e.id != id),
            LedgerEvent::TransactionRecorded(_) => {}
        }
    }

    /// Applies several events in order.
    pub fn apply_events<'a>(&mut self, events: impl IntoIterator<Item = &'a LedgerEvent>) {
        for event in events {
            self.apply(event);
        }
    }
}
