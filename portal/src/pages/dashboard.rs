use tracing::{info, warn};

use shared::types::{ActiveTask, EmployeeOnLeave, Identity, RecentEmployee};

use crate::api::{ApiResult, HrApi};
use crate::session::marker::DASHBOARD_REFRESHED;
use crate::session::{Session, SessionMarker};
use crate::view::LoadState;

/// One dashboard card. Cards load and fail independently.
#[derive(Debug, Clone)]
pub struct Card<T> {
    pub rows: Vec<T>,
    pub state: LoadState,
}

impl<T> Default for Card<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            state: LoadState::Idle,
        }
    }
}

impl<T> Card<T> {
    fn fill(&mut self, name: &str, result: ApiResult<Vec<T>>) {
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                warn!("Dashboard card {} failed to load: {}", name, e);
                self.rows = Vec::new();
                self.state = LoadState::Failed;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub recent: Card<RecentEmployee>,
    pub active: Card<ActiveTask>,
    pub on_leave: Card<EmployeeOnLeave>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Welcome, <email> (HR id <n>)`
    pub fn welcome(identity: &Identity) -> String {
        format!("Welcome, {} (HR id {})", identity.email, identity.hr_id)
    }

    /// Fetch the three cards concurrently.
    pub async fn load(&mut self, api: &dyn HrApi) {
        let (recent, active, on_leave) = tokio::join!(
            api.recent_employees(),
            api.active_tasks(),
            api.employees_on_leave()
        );
        self.recent.fill("recent employees", recent);
        self.active.fill("active tasks", active);
        self.on_leave.fill("employees on leave", on_leave);
    }

    /// Display the dashboard. The first mount of a session also re-reads
    /// the persisted token before loading; returns whether it did.
    pub async fn mount(
        &mut self,
        api: &dyn HrApi,
        session: &mut Session,
        marker: &mut SessionMarker,
        now: u64,
    ) -> bool {
        let refreshed = marker.claim(DASHBOARD_REFRESHED);
        if refreshed {
            info!("First dashboard visit this session, refreshing session");
            session.rehydrate(now);
        }
        self.load(api).await;
        refreshed
    }
}
