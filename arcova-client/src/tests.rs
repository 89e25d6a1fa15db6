// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end scenarios driving the full client surface over mock services.

use assert_matches::assert_matches;

use crate::client::{Client, ClientError};
use crate::identity::Identity;
use crate::intent::{ManageIntent, ManageOutcome};
use crate::test_utils::{MockIdentityService, MockRegistry};

type TestClient = Client<MockIdentityService, MockRegistry>;

fn platform() -> (MockIdentityService, MockRegistry) {
    (MockIdentityService::new(), MockRegistry::new())
}

/// One platform, two browser contexts: the owner adds a second owner through the manage panel
/// and both contexts observe the confirmed result.
#[tokio::test]
async fn add_dataset_owner_across_browser_contexts() {
    let (directory, registry) = platform();

    // Browser context of the dataset creator.
    let alice: TestClient = Client::new(directory.clone(), registry.clone());
    alice.register("alice@lab.org", "correct horse").await.unwrap();
    alice.login("alice@lab.org", "correct horse").await.unwrap();
    let dataset = alice
        .create_dataset("electrophysiology", "raw session recordings")
        .await
        .unwrap();

    // A fresh browser context for the second user.
    let bob: TestClient = Client::new(directory.clone(), registry.clone());
    bob.register("bob@lab.org", "battery staple").await.unwrap();
    bob.login("bob@lab.org", "battery staple").await.unwrap();

    // Bob sees alice as the sole owner and himself absent.
    let snapshot = bob.ownership().load_owners(dataset.id).await.unwrap();
    assert!(snapshot.owners.contains(&Identity::new("alice@lab.org")));
    assert!(!snapshot.owners.contains(&Identity::new("bob@lab.org")));
    assert_eq!(snapshot.owners.len(), 1);

    // Alice opens the manage panel, adds bob by his handle and saves.
    alice.dispatch(dataset.id, ManageIntent::Open).await.unwrap();
    let outcome = alice
        .dispatch(dataset.id, ManageIntent::AddOwner("bob@lab.org".to_string()))
        .await
        .unwrap();
    assert_matches!(outcome, ManageOutcome::Editing(edit) => {
        assert!(edit.additions().contains(&Identity::new("bob@lab.org")));
    });

    let outcome = alice.dispatch(dataset.id, ManageIntent::Save).await.unwrap();
    assert_matches!(outcome, ManageOutcome::Saved(snapshot) => {
        assert!(snapshot.owners.contains(&Identity::new("alice@lab.org")));
        assert!(snapshot.owners.contains(&Identity::new("bob@lab.org")));
    });

    // Bob's context confirms the server-side state.
    let snapshot = bob.ownership().load_owners(dataset.id).await.unwrap();
    assert!(snapshot.owners.contains(&Identity::new("alice@lab.org")));
    assert!(snapshot.owners.contains(&Identity::new("bob@lab.org")));
    assert_eq!(snapshot.owners.len(), 2);
}

#[tokio::test]
async fn unknown_handles_are_rejected_before_staging() {
    let (directory, registry) = platform();

    let alice: TestClient = Client::new(directory, registry);
    alice.register("alice@lab.org", "correct horse").await.unwrap();
    alice.login("alice@lab.org", "correct horse").await.unwrap();
    let dataset = alice.create_dataset("imaging", "calcium traces").await.unwrap();

    alice.dispatch(dataset.id, ManageIntent::Open).await.unwrap();
    let result = alice
        .dispatch(
            dataset.id,
            ManageIntent::AddOwner("nobody@lab.org".to_string()),
        )
        .await;
    assert_matches!(result, Err(ClientError::UnknownIdentity(handle)) if handle == "nobody@lab.org");

    // Nothing was staged by the failed intent.
    let edit = alice.ownership().pending_edit(dataset.id).await.unwrap();
    assert!(edit.is_empty());
}

#[tokio::test]
async fn cancel_discards_staged_changes() {
    let (directory, registry) = platform();

    let alice: TestClient = Client::new(directory, registry.clone());
    alice.register("alice@lab.org", "correct horse").await.unwrap();
    alice.register("bob@lab.org", "battery staple").await.unwrap();
    alice.login("alice@lab.org", "correct horse").await.unwrap();
    let dataset = alice.create_dataset("behaviour", "video tracking").await.unwrap();

    alice.dispatch(dataset.id, ManageIntent::Open).await.unwrap();
    alice
        .dispatch(dataset.id, ManageIntent::AddOwner("bob@lab.org".to_string()))
        .await
        .unwrap();
    let outcome = alice.dispatch(dataset.id, ManageIntent::Cancel).await.unwrap();
    assert_matches!(outcome, ManageOutcome::Cancelled);

    // The registry never heard about any of it.
    use crate::registry::DatasetRegistry;
    let snapshot = registry.get_dataset(dataset.id).await.unwrap();
    assert_eq!(snapshot.version, dataset.version);
    assert_eq!(snapshot.owners.len(), 1);
}

#[tokio::test]
async fn creating_a_dataset_requires_a_session() {
    let (directory, registry) = platform();
    let client: TestClient = Client::new(directory, registry);

    assert_matches!(
        client.create_dataset("orphan", "never happens").await,
        Err(ClientError::NotAuthenticated)
    );
}
