//! Store commands, snapshots and fingerprints

use orcatax_core_rs::factory::{generate, FactoryConfig};
use orcatax_core_rs::models::{ChangeCause, Event, NewClient};
use orcatax_core_rs::store::{ClientStore, Command, StoreConfig, StoreError};
use orcatax_core_rs::{ClientError, ClientStatus};
use proptest::prelude::*;

fn store() -> ClientStore {
    ClientStore::new(generate(3, 2025), &StoreConfig::default()).unwrap()
}

fn change(client_id: &str, to: ClientStatus) -> Command {
    Command::ChangeStatus {
        client_id: client_id.to_string(),
        to,
        cause: ChangeCause::Manual,
    }
}

// ============================================================================
// Manual add
// ============================================================================

#[test]
fn test_add_client_prepends_and_logs() {
    let mut store = store();

    let events = store
        .apply(Command::AddClient(NewClient::named("Skyler Brown")))
        .unwrap();

    let snapshot = store.snapshot();
    let added = &snapshot.clients()[0];
    assert_eq!(added.name(), "Skyler Brown");
    assert_eq!(added.status(), ClientStatus::Ready);
    assert_eq!(snapshot.clients()[1].id(), "C0001");
    assert_eq!(
        events,
        vec![Event::ClientAdded {
            client_id: added.id().to_string(),
            name: "Skyler Brown".to_string(),
        }]
    );
}

#[test]
fn test_empty_name_leaves_roster_unchanged() {
    let mut store = store();
    let before = store.snapshot();

    assert_eq!(
        store.apply(Command::AddClient(NewClient::named(""))),
        Err(StoreError::Client(ClientError::NameRequired))
    );
    assert_eq!(store.snapshot().clients(), before.clients());
    assert_eq!(store.version(), 0);
}

#[test]
fn test_manual_ids_never_collide() {
    let mut store = store();
    for i in 0..50 {
        store
            .apply(Command::AddClient(NewClient::named(format!("Client {}", i))))
            .unwrap();
    }

    let snapshot = store.snapshot();
    let mut ids: Vec<&str> = snapshot.clients().iter().map(|c| c.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 53);
}

#[test]
fn test_id_seed_changes_manual_ids() {
    let mut a = store();
    let mut b = ClientStore::new(generate(3, 2025), &StoreConfig { id_seed: 7 }).unwrap();

    a.apply(Command::AddClient(NewClient::named("Rowan Lee"))).unwrap();
    b.apply(Command::AddClient(NewClient::named("Rowan Lee"))).unwrap();
    assert_ne!(a.snapshot().clients()[0].id(), b.snapshot().clients()[0].id());
}

// ============================================================================
// Status changes
// ============================================================================

#[test]
fn test_happy_path_to_filed() {
    let mut store = store();

    // C0002 starts In Progress
    for to in [ClientStatus::WaitingDocs, ClientStatus::Review, ClientStatus::Filed] {
        store.apply(change("C0002", to)).unwrap();
    }

    assert_eq!(store.get("C0002").unwrap().status(), ClientStatus::Filed);
    assert_eq!(store.events().events_for_client("C0002").len(), 3);
    assert_eq!(store.version(), 3);
}

#[test]
fn test_self_transition_rejected() {
    let mut store = store();
    let err = store.apply(change("C0002", ClientStatus::InProgress)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "C0002: Status transition In Progress -> In Progress is not allowed"
    );
    assert!(store.events().is_empty());
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_snapshot_shared_until_mutation() {
    let mut store = store();
    let a = store.snapshot();
    let b = store.snapshot();
    assert!(a.shares_storage_with(&b));

    store.apply(change("C0001", ClientStatus::Review)).unwrap();
    let c = store.snapshot();
    assert!(!a.shares_storage_with(&c));
    assert_eq!(a.get("C0001").unwrap().status(), ClientStatus::WaitingDocs);
    assert_eq!(c.version(), 1);
}

#[test]
fn test_fingerprint_tracks_content() {
    let mut a = store();
    let b = ClientStore::generated(
        &FactoryConfig {
            count: 3,
            ..FactoryConfig::default()
        },
        &StoreConfig::default(),
    )
    .unwrap();

    let original = a.snapshot().fingerprint().unwrap();
    assert_eq!(original, b.snapshot().fingerprint().unwrap());
    assert_eq!(original.len(), 64);

    a.apply(change("C0001", ClientStatus::Review)).unwrap();
    assert_ne!(a.snapshot().fingerprint().unwrap(), original);
}

// ============================================================================
// Properties
// ============================================================================

fn any_status() -> impl Strategy<Value = ClientStatus> {
    prop::sample::select(ClientStatus::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_changes_follow_table(
        seed in any::<u32>(),
        moves in prop::collection::vec((0usize..10, any_status()), 1..40),
    ) {
        let mut store = ClientStore::new(generate(10, seed), &StoreConfig::default()).unwrap();

        for (index, to) in moves {
            let id = format!("C{:04}", index + 1);
            let from = store.get(&id).unwrap().status();
            let version = store.version();

            match store.apply(change(&id, to)) {
                Ok(events) => {
                    prop_assert!(from.can_transition_to(to));
                    prop_assert_eq!(events.len(), 1);
                    prop_assert_eq!(store.get(&id).unwrap().status(), to);
                    prop_assert_eq!(store.version(), version + 1);
                }
                Err(_) => {
                    prop_assert!(!from.can_transition_to(to));
                    prop_assert_eq!(store.get(&id).unwrap().status(), from);
                    prop_assert_eq!(store.version(), version);
                }
            }
        }

        prop_assert_eq!(store.events().len() as u64, store.version());
    }

    #[test]
    fn prop_replay_is_deterministic(
        seed in any::<u32>(),
        moves in prop::collection::vec((0usize..5, any_status()), 0..20),
        adds in 0usize..5,
    ) {
        let run = || {
            let mut store = ClientStore::new(generate(5, seed), &StoreConfig::default()).unwrap();
            for (index, to) in &moves {
                let _ = store.apply(change(&format!("C{:04}", index + 1), *to));
            }
            for i in 0..adds {
                store.apply(Command::AddClient(NewClient::named(format!("New {}", i)))).unwrap();
            }
            store.snapshot().fingerprint().unwrap()
        };

        prop_assert_eq!(run(), run());
    }
}
