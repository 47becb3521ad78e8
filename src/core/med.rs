use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::config::Config;
use crate::models::medication::Medication;

// ---------------------------------------------------------------------------
// AddMedicationParams
// ---------------------------------------------------------------------------

/// Parameters for adding a new medication.
pub struct AddMedicationParams<'a> {
    pub name: &'a str,
    pub notes: Option<&'a str>,
    pub url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// add_medication
// ---------------------------------------------------------------------------

pub fn add_medication(
    db: &Database,
    config: &Config,
    params: AddMedicationParams<'_>,
) -> Result<Medication> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "medication name must not be empty"));
    }

    let mut med = Medication::new(
        config.profile.owner_id.clone(),
        config.profile.profile_id.clone(),
        name,
    );
    if let Some(n) = params.notes {
        med.notes = Some(n.to_string());
    }
    if let Some(u) = params.url {
        med.url = Some(u.to_string());
    }

    db.insert_medication(&med)
}

// ---------------------------------------------------------------------------
// find_medication
// ---------------------------------------------------------------------------

/// Resolve a medication by id or (alias-resolved) name.
pub fn find_medication(db: &Database, config: &Config, ident: &str) -> Result<Medication> {
    if let Some(med) = db.get_medication(ident)? {
        return Ok(med);
    }
    let resolved = config.resolve_alias(ident);
    match db.get_medication_by_name(&resolved)? {
        Some(med) => Ok(med),
        None => Err(Error::not_found("medication", resolved)),
    }
}

// ---------------------------------------------------------------------------
// update_medication
// ---------------------------------------------------------------------------

pub fn update_medication(
    db: &Database,
    med: &Medication,
    name: Option<&str>,
    notes: Option<&str>,
    url: Option<&str>,
) -> Result<Medication> {
    let new_name = name.unwrap_or(&med.name).trim();
    if new_name.is_empty() {
        return Err(Error::validation("name", "medication name must not be empty"));
    }
    let new_notes = notes.or(med.notes.as_deref());
    let new_url = url.or(med.url.as_deref());

    if !db.update_medication(&med.id, new_name, new_notes, new_url)? {
        return Err(Error::not_found("medication", med.id.clone()));
    }
    match db.get_medication(&med.id)? {
        Some(updated) => Ok(updated),
        None => Err(Error::not_found("medication", med.id.clone())),
    }
}

// ---------------------------------------------------------------------------
// list_medications
// ---------------------------------------------------------------------------

pub fn list_medications(db: &Database) -> Result<Vec<Medication>> {
    db.list_medications()
}
