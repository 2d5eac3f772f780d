use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Block, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs, Wrap,
};
use crate::scoring::{Activity, HIGH_ACTIVITY_THRESHOLD};
use crate::tui::app::{App, InputMode, View};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),  // Title bar
        Constraint::Length(1),  // Tab bar
        Constraint::Fill(1),    // Current view
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    match app.current_view {
        View::Calculator => render_calculator(frame, chunks[2], app),
        View::History => render_history(frame, chunks[2], app),
        View::Chart => render_chart(frame, chunks[2], app),
    }
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title_text = "SLEDAI Calculator";
    let mut spans = vec![Span::styled(title_text, Style::default().fg(app.theme.title_color).bold())];

    // Store status on the right
    let store_text = format!("store: {}", app.store.state_label());
    let padding_len = (area.width as usize).saturating_sub(title_text.len() + store_text.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(store_text, Style::default().fg(app.theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = View::ALL.iter().map(|view| view.title()).collect();
    let selected = View::ALL
        .iter()
        .position(|view| *view == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_calculator(frame: &mut Frame, area: Rect, app: &mut App) {
    let description_height = if app.show_description { 4 } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Fill(1),                      // Checklist
        Constraint::Length(description_height),   // Highlighted description
        Constraint::Length(2),                    // Live total / last result
    ])
    .split(area);

    let theme = &app.theme;
    let selection = app.session.selection();

    let rows: Vec<Row> = app
        .session
        .checklist()
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let checked = selection.is_selected(idx);
            let checkbox = if checked {
                Span::styled("[x]", Style::default().fg(theme.checkbox_on).bold())
            } else {
                Span::styled("[ ]", Style::default().fg(theme.checkbox_off))
            };

            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(checkbox),
                Cell::from(format!("{:>2}", item.score)).style(Style::default().fg(theme.weight_color)),
                Cell::from(item.title.clone()),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),   // Index
        Constraint::Length(3),   // Checkbox
        Constraint::Length(3),   // Weight
        Constraint::Fill(1),     // Title
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "", "Pts", "Descriptor"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, chunks[0], &mut app.checklist_state);

    if app.show_description {
        let text = match app.highlighted() {
            Some(item) if !item.description.is_empty() => item.description.clone(),
            Some(_) => "No description.".to_string(),
            None => String::new(),
        };
        let description = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(app.theme.muted))
            .block(Block::bordered().title(" Description "));
        frame.render_widget(description, chunks[1]);
    }

    render_result_panel(frame, chunks[2], app);
}

fn render_result_panel(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let live = app.session.score();

    let mut lines = vec![Line::from(vec![
        Span::raw("Total: "),
        Span::styled(live.total.to_string(), Style::default().bold()),
        Span::raw(" "),
        Span::styled(
            format!("({})", live.activity),
            Style::default().fg(theme.activity_color(live.activity)),
        ),
        Span::styled(
            format!("  {} selected", app.session.selection().selected_count()),
            Style::default().fg(theme.muted),
        ),
    ])];

    if let Some(result) = &app.last_result {
        lines.push(Line::from(vec![
            Span::styled("Last calculated: ", Style::default().fg(theme.muted)),
            Span::styled(
                format!("{} ({})", result.total, result.activity),
                Style::default().fg(theme.activity_color(result.activity)).bold(),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_history(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.records.is_empty() {
        let empty_msg = Paragraph::new("No saved results")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let theme = &app.theme;
    let rows: Vec<Row> = app
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let activity = Activity::classify(record.score);
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(format!("{:>3}", record.score)).style(Style::default().bold()),
                Cell::from(activity.label())
                    .style(Style::default().fg(theme.activity_color(activity))),
                Cell::from(format_local(record.date)),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),   // Index
        Constraint::Length(5),   // Score
        Constraint::Length(14),  // Classification
        Constraint::Fill(1),     // Date
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Score", "Activity", "Date"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.history_state);
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    let points = app.chart_points();
    if points.is_empty() {
        let empty_msg = Paragraph::new("No saved results to chart")
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, area);
        return;
    }

    let theme = &app.theme;
    let (x_min, x_max) = x_bounds(&points);
    let y_max = y_upper_bound(&points);
    let threshold = f64::from(HIGH_ACTIVITY_THRESHOLD);
    let threshold_points = [(x_min, threshold), (x_max, threshold)];

    let datasets = vec![
        Dataset::default()
            .name(format!("threshold ({})", HIGH_ACTIVITY_THRESHOLD))
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.threshold_line))
            .data(&threshold_points),
        Dataset::default()
            .name("score")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.chart_line))
            .data(&points),
    ];

    let x_labels = vec![
        Span::raw(format_axis_date(x_min)),
        Span::raw(format_axis_date(x_max)),
    ];
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(HIGH_ACTIVITY_THRESHOLD.to_string()),
        Span::raw(format!("{:.0}", y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(" Score over time "))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.axis_color))
                .bounds([x_min, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme.axis_color))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

/// Time axis bounds; a single point gets an hour of padding either side
fn x_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let min = points.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);
    if max - min < 1.0 {
        (min - 3600.0, max + 3600.0)
    } else {
        (min, max)
    }
}

/// Score axis top: above both the highest score and the threshold
fn y_upper_bound(points: &[(f64, f64)]) -> f64 {
    let highest = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    highest.max(f64::from(HIGH_ACTIVITY_THRESHOLD)) + 5.0
}

fn format_axis_date(seconds: f64) -> String {
    DateTime::<Utc>::from_timestamp(seconds as i64, 0)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_local(date: DateTime<Utc>) -> String {
    date.with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.contains("not saved") || msg.starts_with("Failed") {
            theme.flash_error
        } else if msg.starts_with("Saved") {
            theme.flash_success
        } else {
            theme.muted
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = match app.current_view {
            View::Calculator => format!("{} descriptors", app.checklist().len()),
            View::History | View::Chart => format!("{} results", app.records.len()),
        };

        // Build hints with colored shortcut keys
        let mut hint_spans = Vec::new();
        let hints = match app.current_view {
            View::Calculator => vec![
                ("j", "/", "k", ":nav "),
                ("Space", "", "", ":toggle "),
                ("d", "", "", ":desc "),
                ("Enter", "", "", ":save "),
                ("x", "", "", ":reset "),
                ("Tab", "", "", ":view "),
                ("?", "", "", ":help "),
                ("q", "", "", ":quit"),
            ],
            View::History => vec![
                ("j", "/", "k", ":nav "),
                ("r", "", "", ":reload "),
                ("Tab", "", "", ":view "),
                ("?", "", "", ":help "),
                ("q", "", "", ":quit"),
            ],
            View::Chart => vec![
                ("r", "", "", ":reload "),
                ("Tab", "", "", ":view "),
                ("?", "", "", ":help "),
                ("q", "", "", ":quit"),
            ],
        };

        for (i, (key1, sep, key2, label)) in hints.iter().enumerate() {
            if i > 0 {
                hint_spans.push(Span::raw(" "));
            }
            hint_spans.push(Span::styled(*key1, Style::default().fg(theme.status_key_color)));
            if !sep.is_empty() {
                hint_spans.push(Span::raw(*sep));
                hint_spans.push(Span::styled(*key2, Style::default().fg(theme.status_key_color)));
            }
            hint_spans.push(Span::raw(*label));
        }

        let mut spans = vec![
            Span::styled(count, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        spans.extend(hint_spans);
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(50, 15, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);

    // Get inner area (inside the border)
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let shortcuts = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("Space         ", "Toggle descriptor"),
        ("d             ", "Show/hide description"),
        ("Enter         ", "Calculate and save"),
        ("x             ", "Reset selection"),
        ("Tab           ", "Next view"),
        ("r             ", "Reload history"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = shortcuts
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
