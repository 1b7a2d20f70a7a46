use common::Diameter;
use record_store::{Collection, Record};
use serde::{Deserialize, Serialize};

/// Which set of known diameters an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Rod,
    Blade,
}

impl CatalogKind {
    pub fn collection(&self) -> Collection {
        match self {
            CatalogKind::Rod => Collection::Diameters,
            CatalogKind::Blade => Collection::BladeDiameters,
        }
    }
}

/// A known diameter, keyed by its own value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub diameter: Diameter,
}

impl CatalogEntry {
    pub fn new(diameter: Diameter) -> Self {
        Self { diameter }
    }

    pub fn key(&self) -> String {
        self.diameter.key()
    }

    /// Serializes into a record of the given catalogue.
    pub fn to_record(&self, kind: CatalogKind) -> Result<Record, serde_json::Error> {
        Record::from_value(kind.collection(), self.key(), self)
    }

    /// Returns the sorted list of diameters held by the entries.
    pub fn sorted(entries: impl IntoIterator<Item = CatalogEntry>) -> Vec<Diameter> {
        let mut values: Vec<_> = entries.into_iter().map(|e| e.diameter).collect();
        values.sort();
        values.dedup();
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_by_value() {
        let entry = CatalogEntry::new(Diameter::from_mm(12.5).unwrap());
        let record = entry.to_record(CatalogKind::Blade).unwrap();

        assert_eq!(record.collection, Collection::BladeDiameters);
        assert_eq!(record.id, "12.5");
        assert_eq!(record.payload, serde_json::json!({ "diameter": 12.5 }));
    }

    #[test]
    fn sorted_ascending_without_duplicates() {
        let values = [20.0, 8.0, 12.0, 8.0]
            .iter()
            .map(|v| CatalogEntry::new(Diameter::from_mm(*v).unwrap()));
        let sorted: Vec<f64> = CatalogEntry::sorted(values).iter().map(|d| d.as_mm()).collect();
        assert_eq!(sorted, vec![8.0, 12.0, 20.0]);
    }
}
