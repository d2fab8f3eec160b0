use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap};

use portal::format;
use portal::gate::{NAVIGATION, Route};
use portal::notify::Level;
use portal::pages::dashboard::{Card, Dashboard};
use portal::pages::forms::FormState;
use portal::validation::FieldKind;
use portal::view::{CollectionView, LoadState, Projectable};
use shared::types::PredictionResult;

use crate::app::{App, Screen};

const SIDEBAR_WIDTH: u16 = 26;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [body, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    if app.session.is_authenticated() {
        let [nav, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)]).areas(body);
        draw_navigation(frame, app, nav);
        draw_screen(frame, app, main);
    } else {
        draw_screen(frame, app, body);
    }

    frame.render_widget(Paragraph::new(help_line(app)).dim(), footer);
    draw_menu(frame, app);
    draw_notices(frame, app);
}

fn draw_navigation(frame: &mut Frame, app: &App, area: Rect) {
    let title = app
        .session
        .identity()
        .map(|i| i.email.clone())
        .unwrap_or_default();

    let items: Vec<ListItem> = NAVIGATION
        .iter()
        .enumerate()
        .map(|(n, route)| ListItem::new(format!("{} {}", n + 1, route.title())))
        .collect();

    let mut state = ListState::default();
    state.select(NAVIGATION.iter().position(|r| *r == app.route));

    let list = List::new(items)
        .block(Block::bordered().title(title))
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_screen(frame: &mut Frame, app: &mut App, area: Rect) {
    if matches!(app.screen, Screen::List) {
        draw_list(frame, app, area);
        return;
    }

    let title = app.route.title();
    match &app.screen {
        Screen::Login(page) => {
            let [_, form, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(8),
                Constraint::Fill(1),
            ])
            .areas(area);
            let [_, form, _] = Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(60),
                Constraint::Fill(1),
            ])
            .areas(form);
            draw_form(frame, &page.form, form, title, &[]);
        }
        Screen::Dashboard(dashboard) => draw_dashboard(frame, app, dashboard, area),
        Screen::List => {}
        Screen::EmployeeDetail(page) => {
            let block = Block::bordered().title(title);
            let lines: Vec<Line> = match page.state {
                LoadState::Ready => page
                    .fields()
                    .into_iter()
                    .map(|(label, value)| Line::from(vec![format!("{:<12}", label).bold(), value.into()]))
                    .collect(),
                LoadState::Failed => vec![Line::from("Employee not found")],
                _ => vec![Line::from("Loading...")],
            };
            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
        Screen::AddEmployee(page) => draw_form(frame, &page.form, area, title, &[]),
        Screen::TaskForm(page) => {
            if let Some(message) = page.load_error() {
                let block = Block::bordered().title(title);
                frame.render_widget(Paragraph::new(message.to_string()).block(block), area);
                return;
            }
            let assignee = page
                .assignee_name()
                .map(|name| ("assigned_to", name))
                .into_iter()
                .collect::<Vec<_>>();
            draw_form(frame, &page.form, area, title, &assignee);
        }
        Screen::Prediction(page) => {
            let [form, result] =
                Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);
            draw_form(frame, &page.form, form, title, &[]);
            let text = prediction_line(page.result.as_ref());
            frame.render_widget(
                Paragraph::new(text).block(Block::bordered().title("Result")),
                result,
            );
        }
        Screen::NotFound => {
            let block = Block::bordered().title(title);
            frame.render_widget(
                Paragraph::new("Page not found. Press Enter to return to the dashboard.")
                    .block(block),
                area,
            );
        }
    }
}

// -----------------------------------------------------------------------------
// Dashboard
// -----------------------------------------------------------------------------

fn prediction_line(result: Option<&PredictionResult>) -> String {
    match result {
        Some(r) if r.probability.is_some() => {
            format!("{} ({})", r.prediction, format::probability(r.probability))
        }
        Some(r) => r.prediction.clone(),
        None => "Submit the form to get a prediction".to_string(),
    }
}

fn draw_dashboard(frame: &mut Frame, app: &App, dashboard: &Dashboard, area: Rect) {
    let [welcome, cards] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);
    let greeting = app
        .session
        .identity()
        .map(Dashboard::welcome)
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(greeting).block(Block::bordered().title("Dashboard")),
        welcome,
    );

    let [recent, active, on_leave] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(cards);

    draw_card(frame, "Recently Joined", &dashboard.recent, recent, |e| {
        format!("{} {} ({})", e.first_name, e.last_name, e.department)
    });
    draw_card(frame, "Active Tasks", &dashboard.active, active, |t| {
        format!(
            "{} [{}] due {}",
            t.title,
            t.priority,
            format::date(t.due_date.as_deref())
        )
    });
    draw_card(frame, "On Leave Today", &dashboard.on_leave, on_leave, |e| {
        format!("{} ({})", e.employee_name, e.leave_type)
    });
}

fn draw_card<T>(frame: &mut Frame, title: &str, card: &Card<T>, area: Rect, line: impl Fn(&T) -> String) {
    let block = Block::bordered().title(title.to_string());
    let items: Vec<ListItem> = match card.state {
        LoadState::Failed => vec![ListItem::new("Could not load".red())],
        LoadState::Ready if card.is_empty() => vec![ListItem::new("Nothing to show".dim())],
        LoadState::Ready => card.rows.iter().map(|r| ListItem::new(line(r))).collect(),
        _ => vec![ListItem::new("Loading...")],
    };
    frame.render_widget(List::new(items).block(block), area);
}

// -----------------------------------------------------------------------------
// Lists
// -----------------------------------------------------------------------------

fn draw_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let [filters, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    let mut filter = vec![
        Span::from("Search: "),
        Span::from(app.search_text().to_string()).bold(),
    ];
    if app.searching {
        filter.push(Span::from("_").slow_blink());
    }
    if app.route == Route::Employees {
        filter.push(Span::from(format!("   Department: {}", app.employees.department())));
    }
    frame.render_widget(
        Paragraph::new(Line::from(filter)).block(Block::bordered().title(app.route.title())),
        filters,
    );

    let (header, widths, rows, state) = match app.route {
        Route::Employees => (
            vec!["ID", "Name", "Email", "Department", "Role"],
            vec![
                Constraint::Length(10),
                Constraint::Fill(2),
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Fill(1),
            ],
            rows_of(&app.employees.view, |e| {
                vec![
                    e.emp_id.clone(),
                    e.full_name(),
                    e.email.clone(),
                    e.department.clone(),
                    e.role.clone(),
                ]
            }),
            app.employees.view.state(),
        ),
        Route::Leaves => (
            vec!["Name", "Type", "From", "To", "Days", "Status", "Approved By"],
            vec![
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Length(13),
                Constraint::Length(13),
                Constraint::Length(5),
                Constraint::Length(9),
                Constraint::Fill(1),
            ],
            rows_of(&app.leaves.view, |l| {
                vec![
                    l.full_name.clone(),
                    l.leave_type.clone(),
                    format::date(l.starting_date.as_deref()),
                    format::date(l.ending_date.as_deref()),
                    l.total_days
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| format::MISSING.to_string()),
                    l.status.clone(),
                    l.approved_by
                        .clone()
                        .unwrap_or_else(|| format::MISSING.to_string()),
                ]
            }),
            app.leaves.view.state(),
        ),
        Route::Tasks => (
            vec!["Title", "Assigned To", "Start", "Due", "Priority", "Status"],
            vec![
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Length(13),
                Constraint::Length(13),
                Constraint::Length(8),
                Constraint::Length(12),
            ],
            rows_of(&app.tasks.view, |t| {
                vec![
                    t.title.clone(),
                    t.assigned_to_name
                        .clone()
                        .unwrap_or_else(|| format::MISSING.to_string()),
                    format::date(t.start_date.as_deref()),
                    format::date(t.due_date.as_deref()),
                    t.priority.clone(),
                    t.status.clone(),
                ]
            }),
            app.tasks.view.state(),
        ),
        Route::Attendance => (
            vec!["ID", "Name", "Date", "Check In", "Check Out", "Worked", "Status"],
            vec![
                Constraint::Length(10),
                Constraint::Fill(2),
                Constraint::Length(13),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(9),
            ],
            app.attendance
                .rows()
                .into_iter()
                .map(|r| vec![r.emp_id, r.name, r.date, r.check_in, r.check_out, r.worked, r.status])
                .collect(),
            app.attendance.view.state(),
        ),
        _ => return,
    };

    app.table_area = table_area;
    let block = Block::bordered();

    if rows.is_empty() {
        let message = match state {
            LoadState::Loading => "Loading...",
            LoadState::Failed => "Could not load this list",
            _ => "No records found",
        };
        frame.render_widget(Paragraph::new(message).block(block), table_area);
        return;
    }

    let header = Row::new(header.into_iter().map(Cell::from)).bold();
    let table = Table::new(rows.into_iter().map(Row::new), widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(table, table_area, &mut app.table);
}

fn rows_of<T: Projectable>(view: &CollectionView<T>, cells: impl Fn(&T) -> Vec<String>) -> Vec<Vec<String>> {
    view.visible().map(cells).collect()
}

fn draw_menu(frame: &mut Frame, app: &App) {
    let Some((at, footprint)) = app.menu_position() else {
        return;
    };
    let screen = frame.area();
    let area = Rect::new(
        clamp_cell(at.x, screen.width),
        clamp_cell(at.y, screen.height),
        clamp_cell(footprint.width, screen.width),
        clamp_cell(footprint.height, screen.height),
    )
    .intersection(screen);

    let items = app.menu_items();
    let entries: Vec<ListItem> = if items.is_empty() {
        vec![ListItem::new("No actions".dim())]
    } else {
        items.iter().map(|i| ListItem::new(i.label())).collect()
    };
    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.menu_cursor));
    }

    frame.render_widget(Clear, area);
    let list = List::new(entries)
        .block(Block::bordered().title("Actions"))
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn clamp_cell(value: i32, limit: u16) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX).min(limit)
}

// -----------------------------------------------------------------------------
// Forms
// -----------------------------------------------------------------------------

/// `display` overrides the shown value of a field, keyed by field name.
fn draw_form(
    frame: &mut Frame,
    form: &FormState,
    area: Rect,
    title: &str,
    display: &[(&str, String)],
) {
    let mut lines = Vec::new();
    for (n, rule) in form.schema().fields.iter().enumerate() {
        let focused = n == form.focus();
        let raw = form.value(rule.name);
        let value = display
            .iter()
            .find(|(name, _)| *name == rule.name)
            .map(|(_, shown)| shown.clone())
            .unwrap_or_else(|| match rule.kind {
                FieldKind::Text { .. } if rule.name == "password" => "*".repeat(raw.chars().count()),
                _ => raw.to_string(),
            });
        let hint = match rule.kind {
            FieldKind::OneOf(_) => " <space>",
            FieldKind::Date => " (YYYY-MM-DD)",
            FieldKind::File => " (path)",
            _ => "",
        };

        let marker = if focused { "> " } else { "  " };
        let label = Span::from(format!("{}{:<28}", marker, rule.label));
        let label = if focused { label.bold() } else { label };
        let mut spans = vec![label, Span::from(value)];
        if focused {
            spans.push(Span::from("_").slow_blink());
            spans.push(Span::from(hint).dim());
        }
        lines.push(Line::from(spans));

        if let Some(message) = form.errors().get(rule.name) {
            lines.push(Line::from(format!("    {}", message)).fg(Color::Red));
        }
    }

    // Keep the focused field in view on short terminals.
    let visible = area.height.saturating_sub(2) as usize;
    let focus_line = lines_before_focus(form);
    let scroll = focus_line.saturating_sub(visible.saturating_sub(1));

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title(title.to_string()))
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

fn lines_before_focus(form: &FormState) -> usize {
    form.schema()
        .fields
        .iter()
        .take(form.focus())
        .map(|rule| 1 + usize::from(form.errors().get(rule.name).is_some()))
        .sum()
}

// -----------------------------------------------------------------------------
// Chrome
// -----------------------------------------------------------------------------

fn draw_notices(frame: &mut Frame, app: &App) {
    let screen = frame.area();
    let width = 44.min(screen.width);
    let mut y = 0;
    for notice in app.notices.active() {
        if y + 3 > screen.height {
            break;
        }
        let color = match notice.level {
            Level::Success => Color::Green,
            Level::Info => Color::Blue,
            Level::Error => Color::Red,
        };
        let area = Rect::new(screen.width - width, y, width, 3);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(notice.text.clone())
                .block(Block::bordered().border_style(Style::new().fg(color)))
                .wrap(Wrap { trim: true }),
            area,
        );
        y += 3;
    }
}

fn help_line(app: &App) -> &'static str {
    match &app.screen {
        Screen::Login(_) => "Tab next field  Enter sign in  Ctrl-C quit",
        Screen::List if app.searching => "Type to search  Enter/Esc done",
        Screen::List if app.menu_open() => "j/k move  Enter run  Esc close",
        Screen::List => match app.route {
            Route::Employees => "j/k move  Enter actions  / search  f department  a add  r reload  1-7 pages  x sign out  q quit",
            Route::Tasks => "j/k move  Enter actions  / search  s priority  S status  a add  r reload  1-7 pages  x sign out  q quit",
            _ => "j/k move  Enter actions  / search  s sort  r reload  1-7 pages  x sign out  q quit",
        },
        Screen::AddEmployee(_) | Screen::TaskForm(_) | Screen::Prediction(_) => {
            "Tab/Up/Down field  Left/Right choice  Enter submit  Esc back  Ctrl-O sign out"
        }
        Screen::EmployeeDetail(_) => "Esc back  1-7 pages  x sign out  q quit",
        _ => "r reload  1-7 pages  x sign out  q quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_line_shows_probability_when_scored() {
        let scored = PredictionResult {
            prediction: "Leaves".into(),
            probability: Some(0.75),
        };
        assert_eq!(prediction_line(Some(&scored)), "Leaves (75.0%)");

        let bare = PredictionResult {
            prediction: "Stays".into(),
            probability: None,
        };
        assert_eq!(prediction_line(Some(&bare)), "Stays");
        assert_eq!(prediction_line(None), "Submit the form to get a prediction");
    }
}
