//! Directory service
//!
//! Owns the canonical employee collection for a session and exposes the
//! query surface: lookup, substring search, salary ranking, and averaging.
//! The collection is private; callers only ever get read views.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::Employee;
use crate::services::geocoder::Geocoder;
use crate::services::transport::EmployeeTransport;

/// Default ranking size for the top-salary query
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Default)]
pub struct DirectoryService {
    employees: Vec<Employee>,
}

impl DirectoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch, normalize, and enrich the full collection.
    ///
    /// The new collection is built off to the side and only committed once
    /// normalization has succeeded for every record; a transport failure
    /// leaves the previous collection untouched. Geocoding failures are
    /// non-fatal: unresolvable cities keep their placeholder coordinates.
    pub async fn load_all(
        &mut self,
        transport: &dyn EmployeeTransport,
        geocoder: &Geocoder,
    ) -> Result<&[Employee]> {
        let payload = transport.fetch_raw().await?;
        let raw_records = payload.table_data.data;

        let mut employees: Vec<Employee> = raw_records
            .iter()
            .enumerate()
            .map(|(seq, raw)| Employee::from_raw(raw, seq))
            .collect();

        info!(count = employees.len(), "Normalized employee records");

        // Distinct cities still sitting on placeholder coordinates, in
        // discovery order.
        let mut unresolved: Vec<String> = Vec::new();
        for emp in &employees {
            if emp.has_placeholder_coords() && !unresolved.contains(&emp.city) {
                unresolved.push(emp.city.clone());
            }
        }

        if !unresolved.is_empty() {
            debug!(cities = ?unresolved, "Geocoding cities missing from gazetteer");
            let resolved = geocoder.resolve_many(&unresolved).await;

            let mut backfilled = 0usize;
            for emp in &mut employees {
                if !emp.has_placeholder_coords() {
                    continue;
                }
                if let Some(Some(coords)) = resolved.get(&emp.city) {
                    emp.lat = coords.lat;
                    emp.lng = coords.lng;
                    backfilled += 1;
                }
            }
            info!(
                cities = unresolved.len(),
                backfilled, "Geocoding enrichment complete"
            );
        }

        self.employees = employees;
        Ok(&self.employees)
    }

    /// Current collection in insertion order, as a read view.
    pub fn all(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Exact id match.
    pub fn find_by_id(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Case-insensitive substring search across name, city, role, and email.
    /// An empty or whitespace query returns the full collection.
    pub fn search(&self, query: &str) -> Vec<&Employee> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return self.employees.iter().collect();
        }
        self.employees
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&q)
                    || e.city.to_lowercase().contains(&q)
                    || e.role.to_lowercase().contains(&q)
                    || e.email.to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Up to `n` employees by descending salary. Stable: equal salaries keep
    /// their insertion order.
    pub fn top_by_salary(&self, n: usize) -> Vec<&Employee> {
        let mut ranked: Vec<&Employee> = self.employees.iter().collect();
        ranked.sort_by(|a, b| b.salary.total_cmp(&a.salary));
        ranked.truncate(n);
        ranked
    }

    /// Arithmetic mean salary; 0 for an empty collection.
    pub fn average_salary(&self) -> f64 {
        if self.employees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.employees.iter().map(|e| e.salary).sum();
        total / self.employees.len() as f64
    }

    #[cfg(test)]
    fn from_employees(employees: Vec<Employee>) -> Self {
        Self { employees }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use serde_json::json;

    fn employee(id: &str, name: &str, role: &str, city: &str, email: &str, salary: f64) -> Employee {
        let raw: RawRecord = serde_json::from_value(json!({
            "id": id,
            "name": name,
            "role": role,
            "city": city,
            "email": email,
            "salary": salary,
        }))
        .unwrap();
        Employee::from_raw(&raw, 0)
    }

    fn sample_directory() -> DirectoryService {
        DirectoryService::from_employees(vec![
            employee("1", "Asha Rao", "Engineer", "Mumbai", "asha@corp.in", 90_000.0),
            employee("2", "Vikram Iyer", "Designer", "Pune", "vikram@corp.in", 70_000.0),
            employee("3", "Meera Nair", "Engineer", "Delhi", "meera@corp.in", 90_000.0),
            employee("4", "John Smith", "Manager", "London", "john@corp.uk", 120_000.0),
        ])
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let dir = sample_directory();
        let ids: Vec<&str> = dir.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_find_by_id() {
        let dir = sample_directory();
        assert_eq!(dir.find_by_id("3").unwrap().name, "Meera Nair");
        assert!(dir.find_by_id("99").is_none());
    }

    #[test]
    fn test_search_matches_across_fields() {
        let dir = sample_directory();

        // name
        assert_eq!(dir.search("asha").len(), 1);
        // city
        assert_eq!(dir.search("PUNE").len(), 1);
        // role
        assert_eq!(dir.search("engineer").len(), 2);
        // email, substring
        assert_eq!(dir.search("corp.uk").len(), 1);
        // no match
        assert!(dir.search("zzz").is_empty());
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let dir = sample_directory();
        assert_eq!(dir.search("").len(), 4);
        assert_eq!(dir.search("   ").len(), 4);
    }

    #[test]
    fn test_top_by_salary_is_stable_for_ties() {
        let dir = sample_directory();
        let top = dir.top_by_salary(3);
        let ids: Vec<&str> = top.iter().map(|e| e.id.as_str()).collect();
        // 1 and 3 tie at 90k; 1 was inserted first and must stay first
        assert_eq!(ids, ["4", "1", "3"]);
    }

    #[test]
    fn test_top_by_salary_does_not_mutate_source() {
        let dir = sample_directory();
        dir.top_by_salary(2);
        let ids: Vec<&str> = dir.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_top_by_salary_caps_at_collection_size() {
        let dir = sample_directory();
        assert_eq!(dir.top_by_salary(100).len(), 4);
        assert_eq!(dir.top_by_salary(0).len(), 0);
    }

    #[test]
    fn test_average_salary() {
        let dir = DirectoryService::from_employees(vec![
            employee("1", "A", "X", "Mumbai", "", 100.0),
            employee("2", "B", "X", "Mumbai", "", 200.0),
            employee("3", "C", "X", "Mumbai", "", 300.0),
        ]);
        assert_eq!(dir.average_salary(), 200.0);
    }

    #[test]
    fn test_average_salary_empty_collection() {
        let dir = DirectoryService::new();
        assert_eq!(dir.average_salary(), 0.0);
        assert!(dir.is_empty());
    }
}
