//! Service-level behaviour: owner scoping, error mapping and broadcasts.

use super::*;
use crate::domain::ports::MockGadgetRepository;
use crate::domain::{
    ConnectionRegistry, ErrorCode, EventReceiver, GadgetAction, GadgetEvent, GadgetName,
    GroupMembership, OwnerGroup,
};
use crate::test_support::FixedClock;
use chrono::{DateTime, TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};

struct Fixture {
    owner: UserId,
    now: DateTime<Utc>,
    registry: Arc<ConnectionRegistry>,
    membership: GroupMembership,
    events: EventReceiver,
}

impl Fixture {
    fn service(&self, repo: MockGadgetRepository) -> GadgetService<MockGadgetRepository> {
        GadgetService::new(
            Arc::new(repo),
            MutationBroadcaster::new(self.registry.clone()),
            Arc::new(FixedClock::new(self.now)),
        )
    }

    fn gadget(&self, id: i64) -> Gadget {
        Gadget::new(
            GadgetId::new(id),
            self.owner,
            GadgetName::new("Portable Charger Max").expect("valid name"),
            "",
            self.now,
            self.now,
        )
    }

    fn next_event(&mut self) -> Arc<GadgetEvent> {
        self.events.try_recv().expect("broadcast expected")
    }

    fn assert_no_event(&mut self) {
        assert!(self.events.try_recv().is_err(), "no broadcast expected");
    }
}

#[fixture]
fn fixture() -> Fixture {
    let owner = UserId::random();
    let registry = Arc::new(ConnectionRegistry::new());
    let (membership, events) = registry.join_group(OwnerGroup::for_owner(owner));
    Fixture {
        owner,
        now: Utc
            .with_ymd_and_hms(2024, 6, 1, 9, 0, 0)
            .single()
            .expect("valid time"),
        registry,
        membership,
        events,
    }
}

#[rstest]
#[tokio::test]
async fn create_stamps_clock_and_broadcasts_record(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    let stored = fixture.gadget(1);
    let now = fixture.now;
    repo.expect_insert()
        .withf(move |_, _, stamped| *stamped == now)
        .times(1)
        .return_once(move |_, _, _| Ok(stored));
    let service = fixture.service(repo);

    let draft = GadgetDraft::new(GadgetName::new("Portable Charger Max").expect("name"), None);
    let created = service
        .create(fixture.owner, draft)
        .await
        .expect("create succeeds");

    let event = fixture.next_event();
    assert_eq!(event.action(), GadgetAction::Created);
    assert_eq!(event.gadget(), Some(&created));
    fixture.assert_no_event();
    assert_eq!(fixture.membership.group(), &OwnerGroup::for_owner(fixture.owner));
}

#[rstest]
#[tokio::test]
async fn get_of_missing_or_foreign_gadget_is_not_found(fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_find()
        .with(eq(fixture.owner), eq(GadgetId::new(99)))
        .return_once(|_, _| Ok(None));
    let service = fixture.service(repo);

    let error = service
        .get(fixture.owner, GadgetId::new(99))
        .await
        .expect_err("foreign gadget hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_of_foreign_gadget_is_not_found_and_silent(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_update().return_once(|_, _, _, _| Ok(None));
    let service = fixture.service(repo);

    let error = service
        .update(fixture.owner, GadgetId::new(3), GadgetChanges::default())
        .await
        .expect_err("update rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
    fixture.assert_no_event();
}

#[rstest]
#[tokio::test]
async fn replace_overwrites_name_and_keeps_absent_description(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    let stored = fixture.gadget(4);
    repo.expect_update()
        .withf(|_, _, changes, _| changes.name.is_some() && changes.description.is_none())
        .return_once(move |_, _, _, _| Ok(Some(stored)));
    let service = fixture.service(repo);

    let draft = GadgetDraft::new(GadgetName::new("Portable Charger Max").expect("name"), None);
    service
        .replace(fixture.owner, GadgetId::new(4), draft)
        .await
        .expect("replace succeeds");

    assert_eq!(fixture.next_event().action(), GadgetAction::Updated);
}

#[rstest]
#[tokio::test]
async fn delete_broadcasts_id_without_record(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_delete().return_once(|_, _| Ok(true));
    let service = fixture.service(repo);

    service
        .delete(fixture.owner, GadgetId::new(8))
        .await
        .expect("delete succeeds");

    let event = fixture.next_event();
    assert_eq!(event.action(), GadgetAction::Deleted);
    assert_eq!(event.gadget_id(), Some(GadgetId::new(8)));
    assert!(event.gadget().is_none());
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_gadget_is_not_found(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_delete().return_once(|_, _| Ok(false));
    let service = fixture.service(repo);

    let error = service
        .delete(fixture.owner, GadgetId::new(8))
        .await
        .expect_err("nothing deleted");

    assert_eq!(error.code(), ErrorCode::NotFound);
    fixture.assert_no_event();
}

#[rstest]
#[tokio::test]
async fn bulk_delete_rejects_empty_list_without_broadcast(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_delete_many().never();
    let service = fixture.service(repo);

    let error = service
        .bulk_delete(fixture.owner, Vec::new())
        .await
        .expect_err("empty list rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), NO_IDS_PROVIDED);
    fixture.assert_no_event();
}

#[rstest]
#[tokio::test]
async fn bulk_delete_dedupes_and_broadcasts_matched_ids(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_delete_many()
        .withf(|_, ids| ids.to_vec() == vec![GadgetId::new(1), GadgetId::new(2), GadgetId::new(7)])
        .times(1)
        .return_once(|_, _| Ok(vec![GadgetId::new(1), GadgetId::new(2)]));
    let service = fixture.service(repo);

    let deleted = service
        .bulk_delete(
            fixture.owner,
            vec![GadgetId::new(7), GadgetId::new(2), GadgetId::new(1), GadgetId::new(2)],
        )
        .await
        .expect("bulk delete succeeds");

    assert_eq!(deleted, vec![GadgetId::new(1), GadgetId::new(2)]);
    let event = fixture.next_event();
    assert_eq!(event.action(), GadgetAction::BulkDeleted);
    assert_eq!(event.ids(), Some(&deleted[..]));
    fixture.assert_no_event();
}

#[rstest]
#[tokio::test]
async fn bulk_delete_with_no_matches_still_broadcasts(mut fixture: Fixture) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_delete_many().return_once(|_, _| Ok(Vec::new()));
    let service = fixture.service(repo);

    let deleted = service
        .bulk_delete(fixture.owner, vec![GadgetId::new(40)])
        .await
        .expect("bulk delete succeeds");

    assert!(deleted.is_empty());
    assert_eq!(fixture.next_event().ids(), Some(&[][..]));
}

#[rstest]
#[case(GadgetPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(GadgetPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn persistence_errors_are_mapped(
    fixture: Fixture,
    #[case] failure: GadgetPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockGadgetRepository::new();
    repo.expect_list_for_owner()
        .return_once(move |_| Err(failure));
    let service = fixture.service(repo);

    let error = service
        .list(fixture.owner)
        .await
        .expect_err("storage failure surfaces");

    assert_eq!(error.code(), expected);
}
