use admit_match::error::AppError;
use admit_match::matching::{
    CatalogError, CatalogFilter, InstitutionCatalog, InstitutionCsvImporter, InstitutionDraft,
    InstitutionId, InstitutionRecord, MatchService, MatchSettings, ProfileSubmission,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local catalog; listing follows insertion order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryInstitutionCatalog {
    records: Arc<Mutex<Vec<InstitutionRecord>>>,
}

impl InMemoryInstitutionCatalog {
    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<InstitutionRecord>>, CatalogError> {
        self.records
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }
}

impl InstitutionCatalog for InMemoryInstitutionCatalog {
    fn insert(&self, record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError> {
        let mut guard = self.guard()?;
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(CatalogError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: InstitutionRecord) -> Result<InstitutionRecord, CatalogError> {
        let mut guard = self.guard()?;
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(CatalogError::NotFound),
        }
    }

    fn remove(&self, id: &InstitutionId) -> Result<InstitutionRecord, CatalogError> {
        let mut guard = self.guard()?;
        let index = guard
            .iter()
            .position(|existing| &existing.id == id)
            .ok_or(CatalogError::NotFound)?;
        Ok(guard.remove(index))
    }

    fn fetch(&self, id: &InstitutionId) -> Result<Option<InstitutionRecord>, CatalogError> {
        let guard = self.guard()?;
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn list(&self, filter: &CatalogFilter) -> Result<Vec<InstitutionRecord>, CatalogError> {
        let guard = self.guard()?;
        Ok(guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}

/// Build a service over a fresh in-memory catalog holding `drafts`.
pub(crate) fn seeded_service(
    settings: MatchSettings,
    drafts: Vec<InstitutionDraft>,
) -> Result<Arc<MatchService<InMemoryInstitutionCatalog>>, AppError> {
    let catalog = Arc::new(InMemoryInstitutionCatalog::default());
    let service = MatchService::new(catalog, settings)?;
    if !drafts.is_empty() {
        service.import(drafts)?;
    }
    Ok(Arc::new(service))
}

/// Read catalog drafts from a CSV export or a JSON array, chosen by file extension.
pub(crate) fn load_catalog_drafts(path: &Path) -> Result<Vec<InstitutionDraft>, AppError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let drafts = if is_csv {
        InstitutionCsvImporter::from_path(path)?
    } else {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader)?
    };

    info!(path = %path.display(), count = drafts.len(), "loaded catalog seed");
    Ok(drafts)
}

pub(crate) fn load_profile(path: &Path) -> Result<ProfileSubmission, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use admit_match::matching::FindRequest;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("admit-match-{}-{name}", std::process::id()))
    }

    #[test]
    fn catalog_keeps_insertion_order_and_detects_conflicts() {
        let catalog = InMemoryInstitutionCatalog::default();
        let first = InstitutionRecord::new("uni-2", "Zeta College", "BA History");
        let second = InstitutionRecord::new("uni-1", "Alpha College", "BA History");

        catalog.insert(first.clone()).expect("insert first");
        catalog.insert(second.clone()).expect("insert second");

        let listed = catalog.list(&CatalogFilter::default()).expect("list");
        assert_eq!(listed, vec![first.clone(), second]);
        assert!(matches!(catalog.insert(first), Err(CatalogError::Conflict)));
        assert!(matches!(
            catalog.remove(&InstitutionId("uni-9".to_string())),
            Err(CatalogError::NotFound)
        ));
    }

    #[test]
    fn loads_json_and_csv_seeds() {
        let json_path = temp_path("seed.json");
        let mut json_file = File::create(&json_path).expect("create json seed");
        json_file
            .write_all(br#"[{"name":"Maple University","program":"MSc Computer Science","acceptanceRatePercent":45}]"#)
            .expect("write json seed");

        let csv_path = temp_path("seed.csv");
        let mut csv_file = File::create(&csv_path).expect("create csv seed");
        csv_file
            .write_all(
                b"Name,Program,Location,Category,Type,Acceptance Rate,Tuition,National Rank,International Rank,Website,Application Deadline\n\
                  Prairie State College,MBA Finance,\"Regina, Canada\",,,70%,\"18,500\",,,,\n",
            )
            .expect("write csv seed");

        let json_drafts = load_catalog_drafts(&json_path).expect("json loads");
        let csv_drafts = load_catalog_drafts(&csv_path).expect("csv loads");
        let _ = std::fs::remove_file(&json_path);
        let _ = std::fs::remove_file(&csv_path);

        assert_eq!(json_drafts[0].acceptance_rate_percent, Some(45.0));
        assert_eq!(csv_drafts[0].tuition_fees_per_year, Some(18_500.0));

        let service = seeded_service(
            MatchSettings::default(),
            json_drafts.into_iter().chain(csv_drafts).collect(),
        )
        .expect("service builds");
        let page = service.find(FindRequest::default()).expect("find succeeds");
        assert_eq!(page.pagination.total_count, 2);
    }

    #[test]
    fn missing_seed_is_an_io_error() {
        let result = load_catalog_drafts(&temp_path("missing.json"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
