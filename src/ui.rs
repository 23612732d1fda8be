use crate::app::{App, Focus};
use crate::form::{FormField, TransactionForm};
use crate::format::{format_currency, format_currency_whole, format_date};
use crate::models::TransactionKind;
use crate::stats::{self, MonthlyExpense, Summary};
use crate::storage::KeyValueStore;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
};

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, layout[0], app);
    render_summary(f, layout[1], &app.summary());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[2]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(8)])
        .split(body[0]);

    render_form(f, left[0], app.form(), app.focus() == Focus::Form);
    render_chart(f, left[1], &app.series(), app.chart_cursor());
    render_list(f, body[1], app);
    render_footer(f, layout[3], app);
}

fn render_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "fintrack",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  | data "),
        Span::styled(app.ledger().location(), Style::default().fg(Color::Gray)),
    ]));
    f.render_widget(header, area);
}

fn render_summary(f: &mut Frame, area: Rect, summary: &Summary) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let net_color = if summary.net_balance >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    let values = [
        ("Total Income", summary.total_income, Color::Green),
        ("Total Expenses", summary.total_expenses, Color::Red),
        ("Net Balance", summary.net_balance, net_color),
        ("This Month", summary.month_expenses, Color::Cyan),
    ];

    for ((title, value, color), area) in values.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(Span::styled(
            format_currency(value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(card, *area);
    }
}

fn render_form(f: &mut Frame, area: Rect, form: &TransactionForm, focused: bool) {
    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ALL {
        let label = if focused && form.focus() == field {
            Span::styled(
                field.label(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw(field.label())
        };
        let value = match (field, form.kind()) {
            (FormField::Kind, TransactionKind::Income) => {
                Span::styled(form.value(field), Style::default().fg(Color::Green))
            }
            (FormField::Kind, TransactionKind::Expense) => {
                Span::styled(form.value(field), Style::default().fg(Color::Red))
            }
            _ => Span::raw(form.value(field)),
        };
        let mut spans = vec![label, Span::raw(": "), value];
        if let Some(err) = form.errors().for_field(field) {
            spans.push(Span::styled(
                format!("  {err}"),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(" "));
    let hint = match (form.is_editing(), form.errors().is_empty()) {
        (_, false) => "Fix the highlighted fields and press Enter again",
        (true, true) => "Enter: update transaction   Esc: cancel",
        (false, true) => "Enter: add transaction   Esc: go to list",
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Gray))));

    let title = if form.is_editing() {
        "Edit Transaction"
    } else {
        "Add New Transaction"
    };
    let border = if focused { Color::Green } else { Color::White };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_chart(f: &mut Frame, area: Rect, series: &[MonthlyExpense], cursor: usize) {
    let block = Block::default()
        .title("Monthly Expenses")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let average = Paragraph::new(format!(
        "Average: {} per month",
        format_currency_whole(stats::average(series))
    ))
    .style(Style::default().fg(Color::Gray));
    f.render_widget(average, rows[0]);

    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let color = if i == cursor {
                Color::Yellow
            } else {
                Color::Cyan
            };
            Bar::default()
                .value(month.amount.max(0.0).round() as u64)
                .text_value(format_currency_whole(month.amount))
                .label(Line::from(month.month.label()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2);
    f.render_widget(chart, rows[1]);

    if let Some(selected) = series.get(cursor) {
        let detail = Paragraph::new(Line::from(vec![
            Span::raw(format!("{}: ", selected.month.label())),
            Span::styled(
                format_currency(selected.amount),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ]));
        f.render_widget(detail, rows[2]);
    }
}

fn render_list<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let list = app.list();
    let block = Block::default()
        .title("Recent Transactions")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(match app.focus() {
            Focus::List | Focus::Search => Color::Green,
            Focus::Form => Color::White,
        }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let search_style = if app.focus() == Focus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let search_text = if list.is_searching() || app.focus() == Focus::Search {
        list.search_term()
    } else {
        "Search transactions... (/)"
    };
    let search = Paragraph::new(Line::from(vec![
        Span::styled("Search: ", search_style),
        Span::raw(search_text),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(search, rows[0]);

    let visible = list.visible(app.ledger().transactions());
    if visible.is_empty() {
        let empty = Paragraph::new(list.empty_message())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, rows[1]);
        return;
    }

    let table_rows: Vec<Row> = visible
        .iter()
        .map(|tx| {
            let (sign, color) = match tx.kind {
                TransactionKind::Income => ('+', Color::Green),
                TransactionKind::Expense => ('-', Color::Red),
            };
            Row::new(vec![
                Cell::from(format_date(tx.date)),
                Cell::from(tx.description.clone()),
                Cell::from(Span::styled(
                    format!("{sign}{}", format_currency(tx.amount)),
                    Style::default().fg(color),
                )),
                Cell::from(tx.kind.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(10),
        Constraint::Length(12),
        Constraint::Length(7),
    ];
    let table = Table::new(table_rows, widths)
        .header(
            Row::new(vec!["Date", "Description", "Amount", "Type"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(list.selected(visible.len()));
    f.render_stateful_widget(table, rows[1], &mut state);
}

fn render_footer<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let keys = match app.focus() {
        Focus::Form => "Tab/Shift-Tab fields  Enter submit  Esc list/cancel  F5 reload  Ctrl-C quit",
        Focus::List => {
            "j/k move  e edit  d delete  / search  a form  [/] month  r reload  q quit"
        }
        Focus::Search => "type to filter  Enter keep  Esc clear",
    };
    let footer = Paragraph::new(Line::from(vec![
        Span::raw(keys),
        Span::raw("  "),
        Span::styled(app.status(), Style::default().fg(Color::Yellow)),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::models::TransactionDraft;
    use crate::storage::MemoryStore;
    use chrono::{Local, NaiveDate, TimeZone, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(entries: &[(f64, &str, TransactionKind, NaiveDate)]) -> App<MemoryStore> {
        let mut ledger = Ledger::load(MemoryStore::default());
        for (amount, description, kind, date) in entries {
            ledger
                .add(
                    TransactionDraft {
                        amount: *amount,
                        description: description.to_string(),
                        date: *date,
                        kind: *kind,
                    },
                    Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap(),
                )
                .unwrap();
        }
        let now = Local.with_ymd_and_hms(2024, 1, 25, 12, 0, 0).single().unwrap();
        App::new(ledger, 6, now)
    }

    #[test]
    fn empty_ledger_shows_placeholder() {
        let screen = render(&app_with(&[]));

        assert!(screen.contains("Total Income"));
        assert!(screen.contains("$0.00"));
        assert!(screen.contains("No transactions yet."));
        assert!(screen.contains("Add New Transaction"));
    }

    #[test]
    fn cards_and_rows_show_aggregates() {
        let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let screen = render(&app_with(&[
            (100.0, "Salary", TransactionKind::Income, jan(15)),
            (40.0, "Groceries", TransactionKind::Expense, jan(20)),
        ]));

        assert!(screen.contains("$100.00"));
        assert!(screen.contains("$60.00"));
        assert!(screen.contains("-$40.00"));
        assert!(screen.contains("Jan 20, 2024"));
        assert!(screen.contains("Jan 2024: $40.00"));
        assert!(screen.contains("Aug 2023"));
    }
}
