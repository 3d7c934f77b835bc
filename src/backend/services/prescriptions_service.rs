// src/backend/services/prescriptions_service.rs
// Prescription list and the ambulance selection set joined against it

use crate::error::CareError;
use crate::models::emergency_info::AMBULANCE_RX_KEY;
use crate::models::prescription::Prescription;
use crate::services::records_service;
use crate::storage::collection::{scoped_key, RecordCollection};
use crate::storage::kv_store::KeyValueStore;
use std::collections::HashSet;

/// The prescriptions whose rxNumber is in `selection`, in prescription order.
pub fn selected_prescriptions(all: &[Prescription], selection: &[Prescription]) -> Vec<Prescription> {
    let numbers: HashSet<&str> = selection.iter().map(|p| p.rx_number.as_str()).collect();
    all.iter()
        .filter(|p| numbers.contains(p.rx_number.as_str()))
        .cloned()
        .collect()
}

fn open_selection<'a, S: KeyValueStore + ?Sized>(
    store: &'a mut S,
    owner: &str,
) -> Result<RecordCollection<'a, Prescription, S>, CareError> {
    RecordCollection::open_key(store, scoped_key(owner, AMBULANCE_RX_KEY))
}

/// The stored selection snapshots.
pub fn selection<S: KeyValueStore + ?Sized>(store: &mut S, owner: &str) -> Result<Vec<Prescription>, CareError> {
    Ok(open_selection(store, owner)?.into_records())
}

/// rxNumbers currently selected, for check marks on the prescription list.
pub fn selected_rx_numbers<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
) -> Result<Vec<String>, CareError> {
    Ok(selection(store, owner)?
        .into_iter()
        .map(|p| p.rx_number)
        .collect())
}

/// Removes the prescription from the selection when its rxNumber is present,
/// otherwise appends a snapshot of it. The whole set is rewritten either way.
///
/// Returns whether the prescription is selected afterwards.
pub fn toggle_selection<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    prescription: &Prescription,
) -> Result<bool, CareError> {
    if prescription.rx_number.trim().is_empty() {
        return Err(CareError::InvalidInput(
            "Only prescriptions with an Rx number can be selected".to_string(),
        ));
    }
    let mut selection = open_selection(store, owner)?;
    let current = selection.records().to_vec();
    let was_selected = current.iter().any(|p| p.rx_number == prescription.rx_number);
    let next: Vec<Prescription> = if was_selected {
        current
            .into_iter()
            .filter(|p| p.rx_number != prescription.rx_number)
            .collect()
    } else {
        let mut next = current;
        next.push(prescription.clone());
        next
    };
    selection.replace_all(next)?;
    log_info!(
        "Rx {} {} the ambulance list of {}",
        prescription.rx_number,
        if was_selected { "removed from" } else { "added to" },
        owner
    );
    Ok(!was_selected)
}

/// Toggles the stored prescription `id`.
pub fn toggle_selection_by_id<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
    id: &str,
) -> Result<bool, CareError> {
    let prescription = records_service::get::<Prescription, S>(store, owner, id)?;
    toggle_selection(store, owner, &prescription)
}

/// The owner's prescriptions that are selected for the emergency screen.
pub fn ambulance_medications<S: KeyValueStore + ?Sized>(
    store: &mut S,
    owner: &str,
) -> Result<Vec<Prescription>, CareError> {
    let all = records_service::list::<Prescription, S>(store, owner)?;
    let chosen = selection(store, owner)?;
    Ok(selected_prescriptions(&all, &chosen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prescription::PrescriptionInput;
    use crate::storage::kv_store::StableKvStore;
    use ic_stable_structures::DefaultMemoryImpl;

    fn rx(id: &str, number: &str) -> Prescription {
        Prescription {
            id: id.to_string(),
            name: format!("Med {}", id),
            rx_number: number.to_string(),
            ..Prescription::default()
        }
    }

    fn input(name: &str, number: &str) -> PrescriptionInput {
        PrescriptionInput {
            name: name.to_string(),
            purpose: "blood pressure".to_string(),
            frequency: "daily".to_string(),
            strength: "10mg".to_string(),
            pharmacy: "Corner Drug".to_string(),
            notes: String::new(),
            rx_number: number.to_string(),
            image: None,
        }
    }

    #[test]
    fn join_keeps_only_selected_numbers() {
        let all = vec![rx("P1", "A"), rx("P2", "B")];
        let joined = selected_prescriptions(&all, &[rx("x", "B")]);
        assert_eq!(joined, vec![rx("P2", "B")]);
    }

    #[test]
    fn join_follows_prescription_order() {
        let all = vec![rx("P1", "A"), rx("P2", "B"), rx("P3", "C")];
        let joined = selected_prescriptions(&all, &[rx("x", "C"), rx("y", "A")]);
        let ids: Vec<&str> = joined.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P3"]);
    }

    #[test]
    fn join_with_empty_selection_is_empty() {
        assert!(selected_prescriptions(&[rx("P1", "A")], &[]).is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let p = rx("P1", "A");
        assert!(toggle_selection(&mut store, "alice", &p).unwrap());
        assert_eq!(selected_rx_numbers(&mut store, "alice").unwrap(), vec!["A"]);
        assert!(!toggle_selection(&mut store, "alice", &p).unwrap());
        assert!(selection(&mut store, "alice").unwrap().is_empty());
    }

    #[test]
    fn blank_rx_number_cannot_be_selected() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        assert!(matches!(
            toggle_selection(&mut store, "alice", &rx("P1", " ")),
            Err(CareError::InvalidInput(_))
        ));
    }

    #[test]
    fn deleted_prescription_drops_out_of_join() {
        let mut store = StableKvStore::init(DefaultMemoryImpl::default());
        let first = records_service::create(&mut store, "alice", input("Lisinopril", "RX1"), 1).unwrap();
        let second = records_service::create(&mut store, "alice", input("Metformin", "RX2"), 2).unwrap();
        toggle_selection_by_id(&mut store, "alice", &first.id).unwrap();
        toggle_selection_by_id(&mut store, "alice", &second.id).unwrap();
        assert_eq!(ambulance_medications(&mut store, "alice").unwrap().len(), 2);

        records_service::delete::<Prescription, _>(&mut store, "alice", &first.id).unwrap();
        let meds = ambulance_medications(&mut store, "alice").unwrap();
        assert_eq!(meds, vec![second]);
    }
}
