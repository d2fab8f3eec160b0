//! Page, session and dispatcher flows against an in-memory backend.

mod common;

use std::sync::Arc;

use common::*;
use portal::dispatch::{ActionDispatcher, ActionError, Invalidations};
use portal::gate::{Route, resolve};
use portal::pages::PageEffect;
use portal::pages::dashboard::Dashboard;
use portal::pages::forms::TaskFormPage;
use portal::pages::leaves::{LeaveField, LeavesPage};
use portal::pages::login::{LoginOutcome, LoginPage};
use portal::pages::tasks::TasksPage;
use portal::pages::employees::{EmployeeAction, EmployeesPage};
use portal::session::{MemoryTokenStore, Session, SessionMarker, TokenStore};
use portal::view::{CollectionKey, Footprint, LoadOutcome, Point, Viewport};
use shared::types::{LeaveDecision, LoginError};

const VIEW: Viewport = Viewport::new(1024, 768);

fn signed_in() -> Session {
    let store = Arc::new(MemoryTokenStore::with_token(token(&identity(NOW + 3600))));
    let session = Session::hydrate(store, NOW);
    assert!(session.is_authenticated());
    session
}

fn leaves_api() -> FakeApi {
    FakeApi::new(FakeState {
        leaves: vec![leave(1, "Ada Lovelace", "Pending"), leave(2, "Bo Kim", "Pending")],
        ..FakeState::default()
    })
}

/// Handle an action effect the way the shell does.
async fn settle_leaves(
    page: &mut LeavesPage,
    effect: PageEffect,
    api: &FakeApi,
    invalidations: &mut Invalidations,
) -> Result<String, ActionError> {
    let PageEffect::Action { result, .. } = effect else {
        panic!("expected an action effect");
    };
    invalidations.record(&result);
    page.sync(api, invalidations).await;
    result.map(|done| done.notice)
}

#[tokio::test]
async fn approving_a_leave_refetches_with_status_and_approver() {
    let api = leaves_api();
    let session = signed_in();
    let mut invalidations = Invalidations::new();

    let mut page = LeavesPage::new(Footprint::DEFAULT);
    assert_eq!(page.mount(&api, &mut invalidations).await, Some(LoadOutcome::Loaded(2)));

    page.trigger(0, Point::new(200, 100), VIEW);
    let effect = page.decide(LeaveDecision::Approved, &api, &session).await;
    let notice = settle_leaves(&mut page, effect, &api, &mut invalidations)
        .await
        .unwrap();

    assert_eq!(notice, "Leave request approved");
    let ada = page.view.find(&1).unwrap();
    assert_eq!(ada.status, "Approved");
    assert_eq!(ada.approved_by.as_deref(), Some("hr@corp.io"));
    assert!(!page.menu.is_open());
    assert_eq!(api.count("leave_requests"), 2);
}

#[tokio::test]
async fn approver_failure_is_surfaced_but_still_refetches() {
    let api = leaves_api();
    api.fail("record_leave_approver");
    let session = signed_in();
    let mut invalidations = Invalidations::new();

    let mut page = LeavesPage::new(Footprint::DEFAULT);
    page.mount(&api, &mut invalidations).await;
    page.trigger(1, Point::new(10, 10), VIEW);

    let effect = page.decide(LeaveDecision::Rejected, &api, &session).await;
    let err = settle_leaves(&mut page, effect, &api, &mut invalidations)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::ApproverNotRecorded { leave_id: 2, .. }));
    let bo = page.view.find(&2).unwrap();
    assert_eq!(bo.status, "Rejected");
    assert_eq!(bo.approved_by, None);
    assert_eq!(api.count("leave_requests"), 2);
}

#[tokio::test]
async fn failed_status_change_changes_nothing() {
    let api = leaves_api();
    api.fail("change_leave_status");
    let session = signed_in();
    let mut invalidations = Invalidations::new();

    let mut page = LeavesPage::new(Footprint::DEFAULT);
    page.mount(&api, &mut invalidations).await;
    page.trigger(0, Point::new(10, 10), VIEW);

    let effect = page.decide(LeaveDecision::Approved, &api, &session).await;
    let err = settle_leaves(&mut page, effect, &api, &mut invalidations)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "change_leave_status exploded");
    assert_eq!(api.count("record_leave_approver"), 0);
    assert_eq!(api.count("leave_requests"), 1);
    assert!(page.menu.is_open());
}

#[tokio::test]
async fn signed_out_dispatch_makes_no_calls() {
    let api = leaves_api();
    let session = Session::new(Arc::new(MemoryTokenStore::new()));

    let err = ActionDispatcher::new(&api, &session)
        .decide_leave(1, LeaveDecision::Approved)
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::SignedOut));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn mount_fetches_once_until_unmounted() {
    let api = leaves_api();
    let mut invalidations = Invalidations::new();
    let mut page = LeavesPage::new(Footprint::DEFAULT);

    assert!(page.mount(&api, &mut invalidations).await.is_some());
    assert!(page.mount(&api, &mut invalidations).await.is_none());
    page.unmount();
    assert!(page.mount(&api, &mut invalidations).await.is_some());
    assert_eq!(api.count("leave_requests"), 2);
}

#[tokio::test]
async fn remount_starts_from_a_clear_query() {
    let api = leaves_api();
    let mut invalidations = Invalidations::new();
    let mut page = LeavesPage::new(Footprint::DEFAULT);
    page.mount(&api, &mut invalidations).await;

    page.view.set_search("ada");
    page.view.toggle_sort(LeaveField::Status);
    assert_eq!(page.view.visible_len(), 1);

    page.unmount();
    page.mount(&api, &mut invalidations).await;
    assert_eq!(page.view.search(), "");
    assert_eq!(page.view.sort(), None);
    assert_eq!(page.view.visible_len(), 2);
}

#[tokio::test]
async fn failed_fetch_shows_empty_state() {
    let api = leaves_api();
    api.fail("leave_requests");
    let mut page = LeavesPage::new(Footprint::DEFAULT);

    assert_eq!(page.mount(&api, &mut Invalidations::new()).await, Some(LoadOutcome::Failed));
    assert!(page.view.is_empty());
}

#[tokio::test]
async fn deleting_an_employee_refetches_the_list() {
    let api = FakeApi::new(FakeState {
        employees: vec![employee("E1", "Ada", "HR"), employee("E2", "Bo", "Sales")],
        ..FakeState::default()
    });
    let session = signed_in();
    let mut invalidations = Invalidations::new();

    let mut page = EmployeesPage::new(Footprint::DEFAULT);
    page.mount(&api, &mut invalidations).await;
    page.trigger(1, Point::new(50, 50), VIEW);

    let PageEffect::Action { result, .. } =
        page.perform(EmployeeAction::Delete, &api, &session).await
    else {
        panic!("expected an action effect");
    };
    assert_eq!(result.as_ref().unwrap().invalidates, CollectionKey::Employees);
    invalidations.record(&result);
    page.sync(&api, &mut invalidations).await;

    let ids: Vec<_> = page.view.visible().map(|e| e.emp_id.as_str()).collect();
    assert_eq!(ids, ["E1"]);
}

#[tokio::test]
async fn view_action_navigates_to_detail() {
    let api = FakeApi::new(FakeState {
        employees: vec![employee("E1", "Ada", "HR")],
        ..FakeState::default()
    });
    let session = signed_in();
    let mut page = EmployeesPage::new(Footprint::DEFAULT);
    page.mount(&api, &mut Invalidations::new()).await;
    page.trigger(0, Point::new(50, 50), VIEW);

    match page.perform(EmployeeAction::View, &api, &session).await {
        PageEffect::Navigate(route) => assert_eq!(route, Route::EmployeeDetail("E1".into())),
        other => panic!("unexpected effect {:?}", other),
    }
}

#[tokio::test]
async fn create_task_stamps_actor_hr_id() {
    let api = FakeApi::new(FakeState {
        basics: vec![shared::types::EmployeeBasic {
            id: 3,
            emp_id: "E3".into(),
            first_name: "Ada".into(),
            last_name: "L".into(),
        }],
        ..FakeState::default()
    });
    let session = signed_in();

    let mut page = TaskFormPage::create();
    page.load(&api).await;
    for (k, v) in [
        ("title", "Payroll"),
        ("description", "Run payroll"),
        ("start_date", "2024-07-01"),
        ("due_date", "2024-07-03"),
        ("priority", "High"),
        ("status", "Pending"),
    ] {
        page.form.set(k, v);
    }
    page.cycle_assignee();

    let PageEffect::Action { result, then } = page.submit(&api, &session).await else {
        panic!("expected an action effect");
    };
    assert!(result.is_ok());
    assert_eq!(then, Some(Route::Tasks));

    let state = api.state.lock().unwrap();
    assert_eq!(state.tasks[0].assigned_by, Some(7));
    assert_eq!(state.tasks[0].assigned_to, Some(3));
}

#[tokio::test]
async fn creating_a_task_then_opening_the_list_fetches_it_once() {
    let api = FakeApi::new(FakeState {
        basics: vec![shared::types::EmployeeBasic {
            id: 3,
            emp_id: "E3".into(),
            first_name: "Ada".into(),
            last_name: "L".into(),
        }],
        ..FakeState::default()
    });
    let session = signed_in();
    let mut invalidations = Invalidations::new();

    let mut page = TaskFormPage::create();
    page.load(&api).await;
    for (k, v) in [
        ("title", "Payroll"),
        ("description", "Run payroll"),
        ("start_date", "2024-07-01"),
        ("due_date", "2024-07-03"),
        ("priority", "High"),
        ("status", "Pending"),
    ] {
        page.form.set(k, v);
    }
    page.cycle_assignee();

    let PageEffect::Action { result, then } = page.submit(&api, &session).await else {
        panic!("expected an action effect");
    };
    invalidations.record(&result);
    assert_eq!(then, Some(Route::Tasks));

    // Navigating to the list mounts it, then the shell syncs stale lists.
    let mut tasks = TasksPage::new(Footprint::DEFAULT);
    assert_eq!(tasks.mount(&api, &mut invalidations).await, Some(LoadOutcome::Loaded(1)));
    assert_eq!(tasks.sync(&api, &mut invalidations).await, None);
    assert_eq!(api.count("tasks"), 1);
}

#[tokio::test]
async fn editing_a_task_sends_only_changed_fields() {
    let api = FakeApi::new(FakeState {
        tasks: vec![task(4, "Audit")],
        ..FakeState::default()
    });
    let session = signed_in();
    let mut invalidations = Invalidations::new();

    let mut page = TaskFormPage::edit(4);
    page.load(&api).await;
    assert_eq!(page.form.value("start_date"), "2024-05-01");

    page.form.set("status", "Completed");
    page.form.set("remarks", "done early");

    let PageEffect::Action { result, .. } = page.submit(&api, &session).await else {
        panic!("expected an action effect");
    };
    invalidations.record(&result);
    assert_eq!(api.count("update_task_field"), 2);

    let mut tasks = TasksPage::new(Footprint::DEFAULT);
    tasks.mount(&api, &mut invalidations).await;
    assert!(!invalidations.is_stale(CollectionKey::Tasks));
    let row = tasks.view.find(&4).unwrap();
    assert_eq!(row.status, "Completed");
    assert_eq!(row.remarks.as_deref(), Some("done early"));
}

#[tokio::test]
async fn invalid_task_form_is_not_submitted() {
    let api = FakeApi::default();
    let session = signed_in();
    let mut page = TaskFormPage::create();

    assert!(matches!(page.submit(&api, &session).await, PageEffect::None));
    assert!(page.form.errors().get("title").is_some());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn dashboard_refreshes_once_per_session() {
    let api = FakeApi::default();
    let mut session = signed_in();
    let mut marker = SessionMarker::new();
    let mut dashboard = Dashboard::new();

    assert!(dashboard.mount(&api, &mut session, &mut marker, NOW).await);
    assert!(!dashboard.mount(&api, &mut session, &mut marker, NOW).await);
    assert_eq!(api.count("recent_employees"), 2);

    marker.clear();
    assert!(dashboard.mount(&api, &mut session, &mut marker, NOW).await);
}

#[tokio::test]
async fn dashboard_refresh_drops_a_token_that_expired_meanwhile() {
    let api = FakeApi::default();
    let mut session = signed_in();
    let mut marker = SessionMarker::new();
    let mut dashboard = Dashboard::new();

    dashboard
        .mount(&api, &mut session, &mut marker, NOW + 7200)
        .await;

    assert!(!session.is_authenticated());
    assert_eq!(session.store().load().unwrap(), None);
    assert_eq!(resolve(Route::Dashboard, session.identity()), Route::Login);
}

#[tokio::test]
async fn dashboard_cards_fail_independently() {
    let api = FakeApi::new(FakeState {
        active: vec![shared::types::ActiveTask {
            title: "Audit".into(),
            due_date: None,
            priority: "High".into(),
        }],
        ..FakeState::default()
    });
    api.fail("recent_employees");
    let mut dashboard = Dashboard::new();
    dashboard.load(&api).await;

    assert_eq!(dashboard.recent.state, portal::view::LoadState::Failed);
    assert_eq!(dashboard.active.rows.len(), 1);
    assert_eq!(dashboard.on_leave.state, portal::view::LoadState::Ready);
}

#[tokio::test]
async fn login_persists_token_and_opens_dashboard() {
    let issued = token(&identity(NOW + 600));
    let api = FakeApi::new(FakeState {
        login_token: Some(issued.clone()),
        ..FakeState::default()
    });
    let store = Arc::new(MemoryTokenStore::new());
    let mut session = Session::hydrate(store.clone(), NOW);
    assert_eq!(resolve(Route::Employees, session.identity()), Route::Login);

    let mut page = LoginPage::default();
    page.form.set("email", "hr@corp.io");
    page.form.set("password", "pw");

    let outcome = page.submit(&api, &mut session, NOW).await;
    assert_eq!(
        outcome,
        LoginOutcome::SignedIn {
            message: "Login successful".into()
        }
    );
    assert_eq!(store.load().unwrap(), Some(issued));
    assert_eq!(resolve(Route::Login, session.identity()), Route::Dashboard);
}

#[tokio::test]
async fn rejected_login_stays_signed_out() {
    let api = FakeApi::default();
    let mut session = Session::new(Arc::new(MemoryTokenStore::new()));
    let mut page = LoginPage::default();
    page.form.set("email", "hr@corp.io");
    page.form.set("password", "wrong");

    assert_eq!(
        page.submit(&api, &mut session, NOW).await,
        LoginOutcome::Failed(LoginError::InvalidCredentials)
    );
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn login_with_an_already_expired_token_fails() {
    let api = FakeApi::new(FakeState {
        login_token: Some(token(&identity(NOW))),
        ..FakeState::default()
    });
    let store = Arc::new(MemoryTokenStore::new());
    let mut session = Session::new(store.clone());
    let mut page = LoginPage::default();
    page.form.set("email", "hr@corp.io");
    page.form.set("password", "pw");

    assert_eq!(
        page.submit(&api, &mut session, NOW).await,
        LoginOutcome::Failed(LoginError::InternalError)
    );
    assert_eq!(store.load().unwrap(), None);
}
