use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use ratatui::widgets::TableState;
use tracing::{debug, info, warn};

use portal::dispatch::Invalidations;
use portal::gate::{NAVIGATION, Route, resolve};
use portal::notify::Notices;
use portal::pages::PageEffect;
use portal::pages::attendance::{AttendanceField, AttendancePage};
use portal::pages::dashboard::Dashboard;
use portal::pages::employee_detail::EmployeeDetail;
use portal::pages::employees::{EmployeeAction, EmployeesPage};
use portal::pages::forms::{AddEmployeePage, FormState, TaskFormPage};
use portal::pages::leaves::{LeaveField, LeavesPage};
use portal::pages::login::{LoginOutcome, LoginPage};
use portal::pages::prediction::PredictionPage;
use portal::pages::tasks::{TaskAction, TaskField, TasksPage};
use portal::session::{Session, SessionMarker, now_secs};
use portal::validation::FieldKind;
use portal::view::{CollectionKey, Footprint, Interaction, Point, Propagation, Viewport};
use portal::{ApiError, HttpApi};
use shared::types::client_config::ClientConfig;
use shared::types::{LeaveDecision, PredictionModel};

use crate::input::{Input, translate};
use crate::ui;

/// How long the loop waits for input before pruning notices.
const TICK: Duration = Duration::from_millis(250);

/// What the open row menu offers on the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Employee(EmployeeAction),
    Leave(LeaveDecision),
    Task(TaskAction),
}

impl MenuItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Employee(a) => a.label(),
            Self::Leave(LeaveDecision::Approved) => "Approve",
            Self::Leave(LeaveDecision::Rejected) => "Reject",
            Self::Task(a) => a.label(),
        }
    }
}

pub enum Screen {
    Login(LoginPage),
    Dashboard(Dashboard),
    /// One of the four list pages owned by [`App`]; which one follows the
    /// route.
    List,
    EmployeeDetail(EmployeeDetail),
    AddEmployee(AddEmployeePage),
    TaskForm(TaskFormPage),
    Prediction(PredictionPage),
    NotFound,
}

pub struct App {
    pub api: HttpApi,
    pub session: Session,
    pub marker: SessionMarker,
    pub notices: Notices,
    pub invalidations: Invalidations,
    pub route: Route,
    pub screen: Screen,

    pub employees: EmployeesPage,
    pub leaves: LeavesPage,
    pub tasks: TasksPage,
    pub attendance: AttendancePage,

    /// Row cursor of the current list.
    pub table: TableState,
    /// Area the list table was last drawn in.
    pub table_area: Rect,
    pub menu_cursor: usize,
    pub searching: bool,
    pub viewport: Viewport,
    quit: bool,
}

impl App {
    pub fn new(api: HttpApi, session: Session, config: &ClientConfig) -> Self {
        let ui = &config.ui;
        let footprint = Footprint::new(
            i32::from(ui.menu_width),
            i32::from(ui.menu_height),
            i32::from(ui.menu_padding),
        );
        Self {
            api,
            session,
            marker: SessionMarker::new(),
            notices: Notices::new(ui.notice_ttl()),
            invalidations: Invalidations::new(),
            route: Route::Login,
            screen: Screen::Login(LoginPage::default()),
            employees: EmployeesPage::new(footprint),
            leaves: LeavesPage::new(footprint),
            tasks: TasksPage::new(footprint),
            attendance: AttendancePage::new(footprint),
            table: TableState::default(),
            table_area: Rect::default(),
            menu_cursor: 0,
            searching: false,
            viewport: Viewport::new(80, 24),
            quit: false,
        }
    }

    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.navigate(Route::Dashboard).await;

        while !self.quit {
            let size = terminal.size()?;
            self.viewport = Viewport::new(i32::from(size.width), i32::from(size.height));
            terminal.draw(|frame| ui::draw(frame, &mut self))?;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) => {
                        let input = translate(key, self.is_typing());
                        self.handle(input).await;
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
            self.notices.prune(Instant::now());
        }

        info!("Shutting down");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Show `requested`, or whatever the gate sends the user to instead.
    pub async fn navigate(&mut self, requested: Route) {
        let mut route = resolve(requested.clone(), self.session.identity());
        if route != requested {
            debug!("Gate redirected {} to {}", requested, route);
        }

        self.close_lists();
        self.table = TableState::default();
        self.searching = false;

        let mut dashboard = None;
        if route == Route::Dashboard {
            let mut page = Dashboard::new();
            page.mount(&self.api, &mut self.session, &mut self.marker, now_secs())
                .await;
            if self.session.is_authenticated() {
                dashboard = Some(page);
            } else {
                route = Route::Login;
            }
        }

        self.screen = match &route {
            Route::Login => Screen::Login(LoginPage::default()),
            Route::Dashboard => Screen::Dashboard(dashboard.unwrap_or_default()),
            Route::Employees => {
                self.employees.mount(&self.api, &mut self.invalidations).await;
                Screen::List
            }
            Route::Leaves => {
                self.leaves.mount(&self.api, &mut self.invalidations).await;
                Screen::List
            }
            Route::Tasks => {
                self.tasks.mount(&self.api, &mut self.invalidations).await;
                Screen::List
            }
            Route::Attendance => {
                self.attendance.mount(&self.api, &mut self.invalidations).await;
                Screen::List
            }
            Route::EmployeeDetail(emp_id) => {
                let mut page = EmployeeDetail::new(emp_id.clone());
                page.load(&self.api).await;
                Screen::EmployeeDetail(page)
            }
            Route::AddEmployee => Screen::AddEmployee(AddEmployeePage::default()),
            Route::CreateTask => {
                let mut page = TaskFormPage::create();
                page.load(&self.api).await;
                Screen::TaskForm(page)
            }
            Route::EditTask(task_id) => {
                let mut page = TaskFormPage::edit(*task_id);
                page.load(&self.api).await;
                Screen::TaskForm(page)
            }
            Route::PerformanceEvaluation => {
                Screen::Prediction(PredictionPage::new(PredictionModel::Performance))
            }
            Route::AttritionPrediction => {
                Screen::Prediction(PredictionPage::new(PredictionModel::Attrition))
            }
            Route::NotFound => Screen::NotFound,
        };

        if self.list_len() > 0 {
            self.table.select(Some(0));
        }
        self.route = route;
    }

    fn close_lists(&mut self) {
        self.employees.unmount();
        self.leaves.unmount();
        self.tasks.unmount();
        self.attendance.unmount();
    }

    async fn sign_out(&mut self) {
        self.session.clear();
        self.marker.clear();
        self.navigate(Route::Login).await;
    }

    // -------------------------------------------------------------------------
    // Effects
    // -------------------------------------------------------------------------

    async fn apply(&mut self, effect: PageEffect) {
        match effect {
            PageEffect::None => {}
            PageEffect::Navigate(route) => self.navigate(route).await,
            PageEffect::Action { result, then } => {
                self.invalidations.record(&result);
                let now = Instant::now();
                match &result {
                    Ok(done) => {
                        self.notices.success(done.notice.clone(), now);
                        if let Some(route) = then {
                            self.navigate(route).await;
                        }
                    }
                    Err(e) => {
                        self.notices.error(e.user_message(), now);
                        if e.is_unauthorized() {
                            warn!("Credential refused, signing out");
                            self.sign_out().await;
                            return;
                        }
                    }
                }
                self.sync_lists().await;
            }
        }
    }

    /// Re-fetch stale collections that are on screen; stale collections
    /// that are not fetch fresh on their next mount anyway.
    async fn sync_lists(&mut self) {
        let api = &self.api;
        let inv = &mut self.invalidations;
        if self.employees.is_mounted() {
            self.employees.sync(api, inv).await;
        } else {
            inv.take(CollectionKey::Employees);
        }
        if self.leaves.is_mounted() {
            self.leaves.sync(api, inv).await;
        } else {
            inv.take(CollectionKey::Leaves);
        }
        if self.tasks.is_mounted() {
            self.tasks.sync(api, inv).await;
        } else {
            inv.take(CollectionKey::Tasks);
        }
        if self.attendance.is_mounted() {
            self.attendance.sync(api, inv).await;
        } else {
            inv.take(CollectionKey::Attendance);
        }
        self.clamp_cursor();
    }

    fn surface_fetch_error(&mut self, e: &ApiError) {
        self.notices.error(e.user_message(), Instant::now());
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Whether keys go into a text field.
    pub fn is_typing(&self) -> bool {
        match &self.screen {
            Screen::Login(_)
            | Screen::AddEmployee(_)
            | Screen::TaskForm(_)
            | Screen::Prediction(_) => true,
            Screen::List => self.searching,
            _ => false,
        }
    }

    async fn handle(&mut self, input: Input) {
        match input {
            Input::Ignore => return,
            Input::Quit => {
                self.quit = true;
                return;
            }
            Input::Logout if self.session.is_authenticated() => {
                self.notices.info("Signed out", Instant::now());
                self.sign_out().await;
                return;
            }
            Input::Nav(n) if self.session.is_authenticated() => {
                if let Some(route) = NAVIGATION.get(n) {
                    self.navigate(route.clone()).await;
                }
                return;
            }
            _ => {}
        }

        match self.screen {
            Screen::Login(_) => self.handle_login(input).await,
            Screen::Dashboard(_) => {
                if input == Input::Reload {
                    let mut page = Dashboard::new();
                    page.load(&self.api).await;
                    self.screen = Screen::Dashboard(page);
                }
            }
            Screen::List => self.handle_list(input).await,
            Screen::EmployeeDetail(_) => {
                if input == Input::Cancel {
                    self.navigate(Route::Employees).await;
                }
            }
            Screen::AddEmployee(_) => self.handle_add_employee(input).await,
            Screen::TaskForm(_) => self.handle_task_form(input).await,
            Screen::Prediction(_) => self.handle_prediction(input).await,
            Screen::NotFound => {
                if input == Input::Cancel || input == Input::Submit {
                    self.navigate(Route::Dashboard).await;
                }
            }
        }
    }

    async fn handle_login(&mut self, input: Input) {
        let Screen::Login(page) = &mut self.screen else {
            return;
        };
        if input != Input::Submit {
            edit_form(&mut page.form, input);
            return;
        }

        match page.submit(&self.api, &mut self.session, now_secs()).await {
            LoginOutcome::Invalid => {}
            LoginOutcome::SignedIn { message } => {
                self.notices.success(message, Instant::now());
                self.navigate(Route::Dashboard).await;
            }
            LoginOutcome::Failed(e) => {
                self.notices.error(e.to_message(), Instant::now());
            }
        }
    }

    async fn handle_add_employee(&mut self, input: Input) {
        let Screen::AddEmployee(page) = &mut self.screen else {
            return;
        };
        match input {
            Input::Submit => {
                let effect = page.submit(&self.api, &self.session).await;
                self.apply(effect).await;
            }
            Input::Cancel => self.navigate(Route::Employees).await,
            other => edit_form(&mut page.form, other),
        }
    }

    async fn handle_task_form(&mut self, input: Input) {
        let Screen::TaskForm(page) = &mut self.screen else {
            return;
        };
        match input {
            Input::Submit => {
                let effect = page.submit(&self.api, &self.session).await;
                self.apply(effect).await;
            }
            Input::Cancel => self.navigate(Route::Tasks).await,
            Input::Cycle if page.form.focused().map(|f| f.name) == Some("assigned_to") => {
                page.cycle_assignee();
            }
            other => edit_form(&mut page.form, other),
        }
    }

    async fn handle_prediction(&mut self, input: Input) {
        let Screen::Prediction(page) = &mut self.screen else {
            return;
        };
        match input {
            Input::Submit => match page.submit(&self.api).await {
                None => {}
                Some(Ok(result)) => {
                    let text = format!("Prediction: {}", result.prediction);
                    self.notices.success(text, Instant::now());
                }
                Some(Err(e)) => self.surface_fetch_error(&e),
            },
            Input::Cancel => self.navigate(Route::Dashboard).await,
            other => edit_form(&mut page.form, other),
        }
    }

    async fn handle_list(&mut self, input: Input) {
        if self.searching {
            self.handle_search(input);
            return;
        }
        if self.menu_open() {
            self.handle_menu(input).await;
            return;
        }

        match input {
            Input::Up => self.move_cursor(-1),
            Input::Down => self.move_cursor(1),
            Input::Search => self.searching = true,
            Input::SortPrimary => self.toggle_sort(true),
            Input::SortSecondary => self.toggle_sort(false),
            Input::Facet if self.route == Route::Employees => {
                self.employees.cycle_department();
                self.clamp_cursor();
            }
            Input::Reload => {
                if let Some(key) = self.list_key() {
                    self.invalidations.invalidate(key);
                    self.sync_lists().await;
                }
            }
            Input::Add => match self.route {
                Route::Employees => self.navigate(Route::AddEmployee).await,
                Route::Tasks => self.navigate(Route::CreateTask).await,
                _ => {}
            },
            Input::Submit => self.open_menu(),
            _ => {}
        }
    }

    fn handle_search(&mut self, input: Input) {
        let mut search = self.search_text().to_string();
        match input {
            Input::Char(c) => search.push(c),
            Input::Backspace => {
                search.pop();
            }
            Input::Submit | Input::Cancel => {
                self.searching = false;
                return;
            }
            _ => return,
        }
        match self.route {
            Route::Employees => self.employees.view.set_search(search),
            Route::Leaves => self.leaves.view.set_search(search),
            Route::Tasks => self.tasks.view.set_search(search),
            Route::Attendance => self.attendance.view.set_search(search),
            _ => {}
        }
        self.clamp_cursor();
    }

    pub fn search_text(&self) -> &str {
        match self.route {
            Route::Employees => self.employees.view.search(),
            Route::Leaves => self.leaves.view.search(),
            Route::Tasks => self.tasks.view.search(),
            Route::Attendance => self.attendance.view.search(),
            _ => "",
        }
    }

    fn toggle_sort(&mut self, primary: bool) {
        match (&self.route, primary) {
            (Route::Leaves, true) => {
                self.leaves.view.toggle_sort(LeaveField::Status);
            }
            (Route::Tasks, true) => {
                self.tasks.view.toggle_sort(TaskField::Priority);
            }
            (Route::Tasks, false) => {
                self.tasks.view.toggle_sort(TaskField::Status);
            }
            (Route::Attendance, true) => {
                self.attendance.view.toggle_sort(AttendanceField::Status);
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Menu
    // -------------------------------------------------------------------------

    pub fn menu_open(&self) -> bool {
        match self.route {
            Route::Employees => self.employees.menu.is_open(),
            Route::Leaves => self.leaves.menu.is_open(),
            Route::Tasks => self.tasks.menu.is_open(),
            _ => false,
        }
    }

    pub fn menu_position(&self) -> Option<(Point, Footprint)> {
        let (at, fp) = match self.route {
            Route::Employees => (self.employees.menu.position(), self.employees.menu.footprint()),
            Route::Leaves => (self.leaves.menu.position(), self.leaves.menu.footprint()),
            Route::Tasks => (self.tasks.menu.position(), self.tasks.menu.footprint()),
            _ => (None, Footprint::DEFAULT),
        };
        at.map(|at| (at, fp))
    }

    pub fn menu_items(&self) -> Vec<MenuItem> {
        match self.route {
            Route::Employees => EmployeeAction::ALL.map(MenuItem::Employee).to_vec(),
            Route::Leaves => vec![
                MenuItem::Leave(LeaveDecision::Approved),
                MenuItem::Leave(LeaveDecision::Rejected),
            ],
            Route::Tasks => TaskAction::ALL.map(MenuItem::Task).to_vec(),
            _ => Vec::new(),
        }
    }

    /// Cell the keyboard trigger anchors the menu at: the right edge of the
    /// cursor row.
    fn cursor_point(&self) -> Point {
        let row = self
            .table
            .selected()
            .unwrap_or(0)
            .saturating_sub(self.table.offset());
        let area = self.table_area;
        // Border plus header row.
        let y = i32::from(area.y) + 2 + row as i32;
        let x = i32::from(area.x) + i32::from(area.width) - 2;
        Point::new(x, y)
    }

    fn open_menu(&mut self) {
        let Some(pos) = self.table.selected() else {
            return;
        };
        let pointer = self.cursor_point();
        self.open_menu_at(pos, pointer);
    }

    fn open_menu_at(&mut self, pos: usize, pointer: Point) {
        let viewport = self.viewport;
        match self.route {
            Route::Employees => {
                self.employees.trigger(pos, pointer, viewport);
            }
            Route::Leaves => {
                self.leaves.trigger(pos, pointer, viewport);
            }
            Route::Tasks => {
                self.tasks.trigger(pos, pointer, viewport);
            }
            _ => {}
        }
        self.menu_cursor = 0;
    }

    fn dismiss_menu(&mut self) {
        let viewport = self.viewport;
        match self.route {
            Route::Employees => {
                self.employees.menu.interact(Interaction::Dismiss, viewport);
            }
            Route::Leaves => {
                self.leaves.menu.interact(Interaction::Dismiss, viewport);
            }
            Route::Tasks => {
                self.tasks.menu.interact(Interaction::Dismiss, viewport);
            }
            _ => {}
        }
    }

    async fn handle_menu(&mut self, input: Input) {
        let items = self.menu_items();
        match input {
            Input::Up => self.menu_cursor = self.menu_cursor.saturating_sub(1),
            Input::Down if self.menu_cursor + 1 < items.len() => self.menu_cursor += 1,
            Input::Cancel => self.dismiss_menu(),
            Input::Submit => {
                let Some(item) = items.get(self.menu_cursor).copied() else {
                    self.dismiss_menu();
                    return;
                };
                let effect = match item {
                    MenuItem::Employee(action) => {
                        self.employees
                            .perform(action, &self.api, &self.session)
                            .await
                    }
                    MenuItem::Leave(decision) => {
                        self.leaves.decide(decision, &self.api, &self.session).await
                    }
                    MenuItem::Task(action) => self.tasks.perform(action),
                };
                self.apply(effect).await;
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let pointer = Point::new(i32::from(mouse.column), i32::from(mouse.row));
        let viewport = self.viewport;
        let propagation = match self.route {
            Route::Employees => self
                .employees
                .menu
                .interact(Interaction::Click { pointer }, viewport),
            Route::Leaves => self
                .leaves
                .menu
                .interact(Interaction::Click { pointer }, viewport),
            Route::Tasks => self
                .tasks
                .menu
                .interact(Interaction::Click { pointer }, viewport),
            _ => Propagation::Continue,
        };
        if propagation == Propagation::Stop {
            return;
        }

        // A click on a table row moves the cursor there and opens the row
        // menu under the pointer.
        let area = self.table_area;
        let first_row = area.y + 2;
        if mouse.row >= first_row && mouse.row < area.y + area.height.saturating_sub(1) {
            let pos = usize::from(mouse.row - first_row) + self.table.offset();
            if pos < self.list_len() {
                self.table.select(Some(pos));
                self.open_menu_at(pos, pointer);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    pub fn list_len(&self) -> usize {
        match self.route {
            Route::Employees => self.employees.view.visible_len(),
            Route::Leaves => self.leaves.view.visible_len(),
            Route::Tasks => self.tasks.view.visible_len(),
            Route::Attendance => self.attendance.view.visible_len(),
            _ => 0,
        }
    }

    fn list_key(&self) -> Option<CollectionKey> {
        match self.route {
            Route::Employees => Some(CollectionKey::Employees),
            Route::Leaves => Some(CollectionKey::Leaves),
            Route::Tasks => Some(CollectionKey::Tasks),
            Route::Attendance => Some(CollectionKey::Attendance),
            _ => None,
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        let len = self.list_len();
        if len == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1);
        self.table.select(Some(next as usize));
    }

    fn clamp_cursor(&mut self) {
        let len = self.list_len();
        match self.table.selected() {
            _ if len == 0 => self.table.select(None),
            Some(pos) if pos >= len => self.table.select(Some(len - 1)),
            None => self.table.select(Some(0)),
            _ => {}
        }
    }
}

/// Typing, focus movement and choice cycling shared by every form.
fn edit_form(form: &mut FormState, input: Input) {
    match input {
        Input::Char(c) => {
            let is_choice = matches!(form.focused().map(|f| f.kind), Some(FieldKind::OneOf(_)));
            if is_choice && c == ' ' {
                form.cycle_choice();
            } else {
                form.push_char(c);
            }
        }
        Input::Backspace => form.pop_char(),
        Input::Next => form.focus_next(),
        Input::Prev => form.focus_prev(),
        Input::Cycle => form.cycle_choice(),
        _ => {}
    }
}
