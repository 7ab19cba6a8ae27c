//! Generic record store
//!
//! One store owns one collection of records and the JSON file backing it.
//! Every mutation rewrites the whole file atomically; a failed write rolls the
//! in-memory collection back so memory and disk stay in step.
//!
//! The store is single-threaded and takes no file locks. Two processes writing
//! the same file at once is not supported.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::audit::{generate_diff, AuditEntry, AuditLogger};
use crate::error::{AssistantError, AssistantResult};
use crate::export::export_records_csv;
use crate::import::read_csv_rows;
use crate::models::{Entity, EntityKind, Patch, Record, RecordId};

use super::file_io::{read_json, write_json_atomic};

/// Load a collection from `path`
///
/// A missing file is an empty collection. Unparseable contents, invalid
/// records, or repeated ids are a persistence error.
pub fn load_collection(path: &Path) -> AssistantResult<Vec<Record>> {
    let records: Vec<Record> = read_json(path)?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id()) {
            return Err(AssistantError::Persistence(format!(
                "{} contains id {} more than once",
                path.display(),
                record.id()
            )));
        }
    }

    tracing::debug!(path = %path.display(), count = records.len(), "loaded collection");
    Ok(records)
}

/// Overwrite `path` with the full collection
pub fn save_collection(path: &Path, records: &[Record]) -> AssistantResult<()> {
    write_json_atomic(path, records)
}

/// Persistence and query engine for one record collection
#[derive(Debug)]
pub struct RecordStore {
    name: &'static str,
    path: PathBuf,
    records: Vec<Record>,
    audit: Option<AuditLogger>,
    csv_delimiter: u8,
}

impl RecordStore {
    /// Open a store backed by `path`, loading whatever it holds
    pub fn open(name: &'static str, path: PathBuf) -> AssistantResult<Self> {
        let records = load_collection(&path)?;
        Ok(Self {
            name,
            path,
            records,
            audit: None,
            csv_delimiter: b',',
        })
    }

    /// Open the store for one entity kind inside `data_dir`
    pub fn open_kind(kind: EntityKind, data_dir: &Path) -> AssistantResult<Self> {
        Self::open(kind.name(), data_dir.join(kind.file_name()))
    }

    /// Record every mutation in an audit log
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Field delimiter for CSV export and import
    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the collection from disk, discarding in-memory state
    pub fn load(&mut self) -> AssistantResult<()> {
        self.records = load_collection(&self.path)?;
        Ok(())
    }

    /// Write the whole collection to disk
    pub fn save(&self) -> AssistantResult<()> {
        save_collection(&self.path, &self.records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id for the next new record: one past the largest id in use
    ///
    /// Fails once the largest id is `RecordId::MAX`.
    pub fn next_id(&self) -> AssistantResult<RecordId> {
        self.id_after(self.max_id())
    }

    fn max_id(&self) -> RecordId {
        self.records.iter().map(Record::id).max().unwrap_or(0)
    }

    fn id_after(&self, id: RecordId) -> AssistantResult<RecordId> {
        id.checked_add(1)
            .ok_or(AssistantError::IdsExhausted { collection: self.name })
    }

    /// Append a record and persist
    ///
    /// The caller supplies the id; an id already in use is rejected.
    pub fn add(&mut self, record: Record) -> AssistantResult<()> {
        if self.get(record.id()).is_some() {
            return Err(AssistantError::DuplicateId {
                collection: self.name,
                id: record.id(),
            });
        }

        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }

        if let Some(record) = self.records.last() {
            tracing::info!(collection = self.name, id = record.id(), "record added");
            self.audit(&[AuditEntry::create(self.name, record)]);
        }
        Ok(())
    }

    /// Append a typed entity and persist
    pub fn add_entity<E: Entity>(&mut self, entity: &E) -> AssistantResult<()> {
        self.add(entity.to_record())
    }

    /// First record with this id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Merge `patch` into the record with this id and persist
    ///
    /// Returns `false` when no record matches. The record's id never changes.
    pub fn update(&mut self, id: RecordId, patch: &Patch) -> AssistantResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let before = self.records[index].clone();
        self.records[index].apply(patch);

        if let Err(e) = self.save() {
            self.records[index] = before;
            return Err(e);
        }

        let after = &self.records[index];
        let diff = generate_diff(&before, after);
        tracing::info!(collection = self.name, id, changes = ?diff, "record updated");
        self.audit(&[AuditEntry::update(self.name, &before, after, diff.clone())]);
        Ok(true)
    }

    /// Remove the record with this id and persist
    ///
    /// Returns `false` (and writes nothing) when no record matches.
    pub fn delete(&mut self, id: RecordId) -> AssistantResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.save() {
            self.records.insert(index, removed);
            return Err(e);
        }

        tracing::info!(collection = self.name, id, "record deleted");
        self.audit(&[AuditEntry::delete(self.name, &removed)]);
        Ok(true)
    }

    /// Records where any value contains `keyword`, ignoring case
    ///
    /// Collection order is preserved.
    pub fn search(&self, keyword: &str) -> Vec<&Record> {
        let needle = keyword.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.contains_lowercase(&needle))
            .collect()
    }

    /// Write the collection to a CSV file
    ///
    /// Returns `false` without creating the file when the collection is empty.
    pub fn export_csv(&self, path: &Path) -> AssistantResult<bool> {
        if self.records.is_empty() {
            tracing::debug!(collection = self.name, "nothing to export");
            return Ok(false);
        }

        // Check before creating the file so a rejected export leaves nothing behind
        let header = crate::export::header_for(&self.records);
        crate::export::check_uniform(&self.records, &header)?;

        let file = File::create(path).map_err(|e| {
            AssistantError::Export(format!("Failed to create {}: {}", path.display(), e))
        })?;
        let rows = export_records_csv(&self.records, BufWriter::new(file), self.csv_delimiter)?;

        tracing::info!(collection = self.name, rows, path = %path.display(), "exported CSV");
        Ok(true)
    }

    /// Append the rows of a CSV file to the collection and persist
    ///
    /// Returns `false` when the file does not exist. With `schema`, known
    /// fields are coerced to their schema types; otherwise every value is
    /// stored as text. Rows whose id is missing, invalid, or already taken get
    /// a fresh id.
    pub fn import_csv(&mut self, path: &Path, schema: Option<EntityKind>) -> AssistantResult<bool> {
        if !path.exists() {
            tracing::warn!(collection = self.name, path = %path.display(), "import file not found");
            return Ok(false);
        }

        let file = File::open(path).map_err(|e| {
            AssistantError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let rows = read_csv_rows(file, self.csv_delimiter, schema)?;

        let original_len = self.records.len();
        let mut taken: HashSet<RecordId> = self.records.iter().map(Record::id).collect();
        // Anything above the running maximum is free
        let mut max_id = self.max_id();

        for row in rows {
            let id = match row.id {
                Some(id) if !taken.contains(&id) => id,
                _ => match self.id_after(max_id) {
                    Ok(id) => id,
                    Err(e) => {
                        self.records.truncate(original_len);
                        return Err(e);
                    }
                },
            };
            taken.insert(id);
            max_id = max_id.max(id);
            self.records.push(row.into_record(id));
        }

        if let Err(e) = self.save() {
            self.records.truncate(original_len);
            return Err(e);
        }

        let imported = &self.records[original_len..];
        tracing::info!(collection = self.name, rows = imported.len(), "imported CSV");
        let entries: Vec<_> = imported
            .iter()
            .map(|r| AuditEntry::import(self.name, r))
            .collect();
        self.audit(&entries);
        Ok(true)
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Audit failures never undo a persisted change; they are only reported
    fn audit(&self, entries: &[AuditEntry]) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log_batch(entries) {
                tracing::warn!(collection = self.name, error = %e, "failed to write audit log");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Contact, FieldValue, FinanceEntry, Note, Priority, Task};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store(kind: EntityKind) -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open_kind(kind, temp_dir.path()).unwrap();
        (temp_dir, store)
    }

    fn contact(id: RecordId, name: &str, phone: &str) -> Record {
        Contact::new(id, name, phone, format!("{}@example.com", name.to_lowercase())).to_record()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (temp_dir, store) = create_test_store(EntityKind::Notes);
        assert!(store.is_empty());
        assert_eq!(store.next_id().unwrap(), 1);
        assert!(!temp_dir.path().join("notes.json").exists());
    }

    #[test]
    fn test_malformed_file_is_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.json"), "[{\"id\": 1,").unwrap();

        let err = RecordStore::open_kind(EntityKind::Notes, temp_dir.path()).unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_duplicate_ids_in_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("tasks.json"),
            r#"[{"id": 1, "title": "a"}, {"id": "1", "title": "b"}]"#,
        )
        .unwrap();

        let err = RecordStore::open_kind(EntityKind::Tasks, temp_dir.path()).unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_add_get_and_reload() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Tasks);
        let task = Task::new(store.next_id().unwrap(), "Pay rent", "Flat", Priority::High, "05-03-2024");
        let record = task.to_record();

        store.add_entity(&task).unwrap();
        assert_eq!(store.get(1), Some(&record));

        let reopened = RecordStore::open_kind(EntityKind::Tasks, temp_dir.path()).unwrap();
        assert_eq!(reopened.get(1), Some(&record));
        assert_eq!(reopened.get(1).unwrap().get("done"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let (_temp_dir, mut store) = create_test_store(EntityKind::Contacts);
        store.add(contact(1, "Ann", "0123456789")).unwrap();

        let err = store.add(contact(1, "Bo", "0123456789")).unwrap_err();
        assert!(matches!(err, AssistantError::DuplicateId { id: 1, .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().text("name"), "Ann");
    }

    #[test]
    fn test_ids_do_not_collide_after_delete() {
        let (_temp_dir, mut store) = create_test_store(EntityKind::Contacts);
        for name in ["Ann", "Bo", "Cy"] {
            let id = store.next_id().unwrap();
            store.add(contact(id, name, "0123456789")).unwrap();
        }

        assert!(store.delete(1).unwrap());
        let id = store.next_id().unwrap();
        assert_eq!(id, 4);
        store.add(contact(id, "Di", "0123456789")).unwrap();

        let ids: Vec<_> = store.records().iter().map(Record::id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_delete() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Contacts);
        store.add(contact(1, "Ann", "0123456789")).unwrap();
        store.add(contact(2, "Bo", "0123456789")).unwrap();

        assert!(store.delete(1).unwrap());
        assert!(store.get(1).is_none());

        let before = store.records().to_vec();
        assert!(!store.delete(42).unwrap());
        assert_eq!(store.records(), before.as_slice());

        let reopened = RecordStore::open_kind(EntityKind::Contacts, temp_dir.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.get(1).is_none());
    }

    #[test]
    fn test_update_merges_and_keeps_id() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Contacts);
        store.add(contact(1, "Ann", "0123456789")).unwrap();

        let patch = Patch::new().set("phone", "9876543210").set("id", 99i64);
        assert!(store.update(1, &patch).unwrap());

        let record = store.get(1).unwrap();
        assert_eq!(record.id(), 1);
        assert_eq!(record.text("phone"), "9876543210");
        assert_eq!(record.text("name"), "Ann");
        assert_eq!(record.text("email"), "ann@example.com");
        assert!(store.get(99).is_none());

        let reopened = RecordStore::open_kind(EntityKind::Contacts, temp_dir.path()).unwrap();
        assert_eq!(reopened.get(1).unwrap().text("phone"), "9876543210");
    }

    #[test]
    fn test_update_unknown_id() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Contacts);
        let patch = Patch::new().set("name", "Nobody");

        assert!(!store.update(7, &patch).unwrap());
        assert!(!temp_dir.path().join("contacts.json").exists());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (_temp_dir, mut store) = create_test_store(EntityKind::Contacts);
        store.add(contact(1, "Anna", "0123456789")).unwrap();
        store.add(contact(2, "Boris", "+7 900 000-00-00")).unwrap();
        store.add(contact(3, "JOANNA", "0123456789")).unwrap();

        let ids: Vec<_> = store.search("anna").iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 3]);

        let ids: Vec<_> = store.search("+7 900").iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![2]);

        assert!(store.search("zzz").is_empty());
    }

    #[test]
    fn test_export_empty_collection_writes_nothing() {
        let (temp_dir, store) = create_test_store(EntityKind::Notes);
        let out = temp_dir.path().join("notes.csv");

        assert!(!store.export_csv(&out).unwrap());
        assert!(!out.exists());
    }

    #[test]
    fn test_export_non_uniform_creates_no_file() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Notes);
        store.add(Note::new(1, "a", "b").to_record()).unwrap();
        store.add(Record::new(2).with("title", "odd")).unwrap();

        let out = temp_dir.path().join("notes.csv");
        assert!(store.export_csv(&out).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_export_import_round_trip_stringifies_values() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Finance);
        store
            .add_entity(&FinanceEntry::new(1, 1500.5, "Salary", "01-03-2024", "March"))
            .unwrap();
        store
            .add_entity(&FinanceEntry::new(2, -40.0, "Food", "02-03-2024", "Groceries"))
            .unwrap();

        let csv_path = temp_dir.path().join("finance.csv");
        assert!(store.export_csv(&csv_path).unwrap());

        let other_dir = TempDir::new().unwrap();
        let mut imported = RecordStore::open_kind(EntityKind::Finance, other_dir.path()).unwrap();
        assert!(imported.import_csv(&csv_path, None).unwrap());

        assert_eq!(imported.len(), 2);
        for original in store.records() {
            let copy = imported.get(original.id()).unwrap();
            assert_eq!(copy.string_values(), original.string_values());
        }
        // Without a schema numbers come back as text
        assert_eq!(
            imported.get(1).unwrap().get("amount"),
            Some(&FieldValue::Text("1500.5".into()))
        );
        assert_eq!(
            imported.get(2).unwrap().get("amount"),
            Some(&FieldValue::Text("-40".into()))
        );
    }

    #[test]
    fn test_import_with_schema_restores_types() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Tasks);
        let mut task = Task::new(1, "Call", "Bank", Priority::Low, "10-10-2024");
        task.done = true;
        store.add_entity(&task).unwrap();

        let csv_path = temp_dir.path().join("tasks.csv");
        store.export_csv(&csv_path).unwrap();

        let other_dir = TempDir::new().unwrap();
        let mut imported = RecordStore::open_kind(EntityKind::Tasks, other_dir.path()).unwrap();
        imported
            .import_csv(&csv_path, Some(EntityKind::Tasks))
            .unwrap();

        assert_eq!(imported.get(1), Some(&task.to_record()));
    }

    #[test]
    fn test_import_reassigns_taken_ids() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Contacts);
        store.add(contact(1, "Ann", "0123456789")).unwrap();

        let csv_path = temp_dir.path().join("in.csv");
        fs::write(&csv_path, "id,name,phone,email\n1,Bo,1,b@x.io\n,Cy,2,c@x.io\n7,Di,3,d@x.io\n")
            .unwrap();

        assert!(store.import_csv(&csv_path, None).unwrap());
        let ids: Vec<_> = store.records().iter().map(Record::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 7]);
        assert_eq!(store.get(2).unwrap().text("name"), "Bo");
    }

    #[test]
    fn test_largest_id_does_not_wrap() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Notes);
        let csv_path = temp_dir.path().join("big.csv");
        fs::write(&csv_path, format!("id,title\n{},big\n", u64::MAX)).unwrap();

        assert!(store.import_csv(&csv_path, None).unwrap());
        assert_eq!(store.get(u64::MAX).unwrap().text("title"), "big");

        let err = store.next_id().unwrap_err();
        assert!(matches!(err, AssistantError::IdsExhausted { collection: "notes" }));

        // A row without an id has nowhere to go; the import leaves nothing behind
        fs::write(&csv_path, "id,title\n,small\n").unwrap();
        assert!(store.import_csv(&csv_path, None).is_err());
        assert_eq!(store.len(), 1);

        let reopened = RecordStore::open_kind(EntityKind::Notes, temp_dir.path()).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.get(u64::MAX).is_some());
    }

    #[test]
    fn test_import_missing_file_returns_false() {
        let (temp_dir, mut store) = create_test_store(EntityKind::Notes);
        assert!(!store.import_csv(&temp_dir.path().join("nope.csv"), None).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_mutations_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        let mut store = RecordStore::open_kind(EntityKind::Contacts, temp_dir.path())
            .unwrap()
            .with_audit(logger.clone());

        store.add(contact(1, "Ann", "0123456789")).unwrap();
        store
            .update(1, &Patch::new().set("name", "Anna"))
            .unwrap();
        store.delete(1).unwrap();

        let ops: Vec<_> = logger
            .read_all()
            .unwrap()
            .iter()
            .map(|e| e.operation)
            .collect();
        assert_eq!(ops, vec![Operation::Create, Operation::Update, Operation::Delete]);

        let update = &logger.read_all().unwrap()[1];
        assert_eq!(
            update.diff_summary.as_deref(),
            Some("name: \"Ann\" -> \"Anna\"")
        );
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes every write fail
        let path = temp_dir.path().join("notes.json");
        fs::create_dir(&path).unwrap();
        let mut store = RecordStore {
            name: "notes",
            path,
            records: Vec::new(),
            audit: None,
            csv_delimiter: b',',
        };

        assert!(store.add(Record::new(1).with("title", "x")).is_err());
        assert!(store.is_empty());
    }
}
