use crate::app::{App, Screen};
use crate::dialog::{ConfirmDialog, EditDialog};
use crate::form::Form;
use crate::project_list::{ProjectListPage, ProjectOverlay};
use crate::task::TaskStatus;
use crate::task_list::{TaskListPage, TaskOverlay};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PROJECT_HINTS: &str = "a add  e edit  d delete  enter tasks  r reload  L logout  q quit";
const TASK_HINTS: &str = "a add  e/enter edit  d delete  r reload  b back  L logout  q quit";
const FORM_HINTS: &str = "tab next field  \u{2190}/\u{2192} change choice  enter save  esc cancel";
const CONFIRM_HINTS: &str = "y confirm  n cancel";
const LOGIN_HINTS: &str = "tab next field  enter sign in  esc quit";

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key.code);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let signed_in = if app.session().is_authenticated() {
        "signed in"
    } else {
        "signed out"
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("taskdesk ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{}  ({})", app.route, signed_in)),
        ])),
        chunks[0],
    );

    let hints = match &app.screen {
        Screen::Login(page) => {
            draw_form(f, centered(60, 8, chunks[1]), "Sign in", &page.form);
            LOGIN_HINTS
        }
        Screen::Projects(page) => {
            draw_projects(f, chunks[1], page);
            match &page.overlay {
                ProjectOverlay::None => PROJECT_HINTS,
                ProjectOverlay::Editor(dialog) => {
                    draw_editor(f, chunks[1], dialog);
                    FORM_HINTS
                }
                ProjectOverlay::ConfirmDelete { dialog, .. } => {
                    draw_confirm(f, chunks[1], dialog);
                    CONFIRM_HINTS
                }
            }
        }
        Screen::Tasks(page) => {
            draw_tasks(f, chunks[1], page);
            match &page.overlay {
                TaskOverlay::None => TASK_HINTS,
                TaskOverlay::Editor(dialog) => {
                    draw_editor(f, chunks[1], dialog);
                    FORM_HINTS
                }
                TaskOverlay::ConfirmDelete { dialog, .. } => {
                    draw_confirm(f, chunks[1], dialog);
                    CONFIRM_HINTS
                }
            }
        }
    };

    let footer = match &app.notice {
        Some(notice) => Paragraph::new(notice.as_str()).style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(footer, chunks[2]);
}

fn table<'a>(title: String, header: Vec<&'a str>, rows: Vec<Row<'a>>, widths: Vec<Constraint>) -> Table<'a> {
    Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().title(title).borders(Borders::ALL))
        .row_highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ")
}

fn draw_projects(f: &mut Frame, area: Rect, page: &ProjectListPage) {
    let rows = page
        .projects
        .iter()
        .map(|p| {
            Row::new(vec![
                p.name.clone(),
                p.chain.clone().unwrap_or_default(),
                p.source.clone().unwrap_or_default(),
                p.status.to_string(),
                p.created_at.clone(),
            ])
        })
        .collect();
    let widget = table(
        format!("Projects ({})", page.projects.len()),
        vec!["Name", "Chain", "Source", "Status", "Created"],
        rows,
        vec![
            Constraint::Percentage(30),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(10),
            Constraint::Percentage(30),
        ],
    );
    let mut state = TableState::default().with_selected((!page.projects.is_empty()).then_some(page.selected));
    f.render_stateful_widget(widget, area, &mut state);
}

fn draw_tasks(f: &mut Frame, area: Rect, page: &TaskListPage) {
    let rows = page
        .tasks
        .iter()
        .map(|t| {
            let status = Span::styled(
                t.status.to_string(),
                match t.status {
                    TaskStatus::Done => Style::default().fg(Color::Green),
                    TaskStatus::Pending => Style::default(),
                },
            );
            Row::new(vec![
                Line::from(t.title.clone()),
                Line::from(status),
                Line::from(t.deadline.clone().unwrap_or_default()),
                Line::from(t.link.clone().unwrap_or_default()),
            ])
        })
        .collect();
    let widget = table(
        format!("Tasks of project #{} ({})", page.project_id, page.tasks.len()),
        vec!["Title", "Status", "Deadline", "Link"],
        rows,
        vec![
            Constraint::Percentage(40),
            Constraint::Percentage(10),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    );
    let mut state = TableState::default().with_selected((!page.tasks.is_empty()).then_some(page.selected));
    f.render_stateful_widget(widget, area, &mut state);
}

fn draw_editor(f: &mut Frame, area: Rect, dialog: &dyn EditDialog) {
    let height = dialog.form().fields.len() as u16 + 2;
    draw_form(f, centered(70, height, area), &dialog.title(), dialog.form());
}

fn draw_form(f: &mut Frame, area: Rect, title: &str, form: &Form) {
    let lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let marker = if field.required { "*" } else { " " };
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::styled(format!("{}{:<12} ", marker, field.label), label_style),
                Span::raw(field.display_value()),
            ];
            if focused {
                spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
            }
            if let Some(error) = field.error().filter(|_| !field.value.is_empty()) {
                spans.push(Span::styled(format!("  {}", error), Style::default().fg(Color::Red)));
            }
            Line::from(spans)
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(title.to_string()).borders(Borders::ALL)),
        area,
    );
}

fn draw_confirm(f: &mut Frame, area: Rect, dialog: &ConfirmDialog) {
    let area = centered(50, 5, area);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(dialog.message.as_str()),
            Line::from(""),
            Line::from(Span::styled("[y] yes   [n] no", Style::default().fg(Color::DarkGray))),
        ])
        .block(
            Block::default()
                .title(dialog.title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        ),
        area,
    );
}

fn centered(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = ((u32::from(area.width) * u32::from(percent_x) / 100) as u16)
        .max(20)
        .min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
