use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use fisiocal_core::models::{CalendarEvent, CLINIC_CLOSING_HOUR, CLINIC_OPENING_HOUR};

use crate::app::{App, Focus};
use crate::ui::styles;

const WEEKDAY_SHORT: [&str; 7] = ["Seg", "Ter", "Qua", "Qui", "Sex", "Sáb", "Dom"];

const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// "Seg 03/06"
pub fn date_label(date: NaiveDate) -> String {
    let weekday = WEEKDAY_SHORT[date.weekday().num_days_from_monday() as usize];
    format!("{} {}", weekday, date.format("%d/%m"))
}

/// "Junho 2024"
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}

fn within_opening_hours(event: &CalendarEvent) -> bool {
    (CLINIC_OPENING_HOUR..CLINIC_CLOSING_HOUR).contains(&event.hour())
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_event_list(frame, app, chunks[0]);
    render_event_detail(frame, app, chunks[1]);
}

fn render_event_list(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Events);

    let header = Row::new(vec![
        Cell::from("Data"),
        Cell::from("Horário"),
        Cell::from("Alunos"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let style = if i == app.event_selection {
                styles::selected_style()
            } else if event.date() < app.today {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };

            let time_style = if within_opening_hours(event) {
                style
            } else {
                style.patch(styles::error_style())
            };

            Row::new(vec![
                Cell::from(date_label(event.date())),
                Cell::from(event.time_range_label()).style(time_style),
                Cell::from(event.title.clone()).style(style.patch(styles::event_style(event.color_hint.as_deref()))),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(11), // "Seg 03/06"
        Constraint::Length(15), // "08:00 - 09:00"
        Constraint::Fill(1),
    ];

    let title = format!(" Horários ({}) ", app.events.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        );

    let mut state = TableState::default();
    if !app.events.is_empty() {
        state.select(Some(app.event_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_event_detail(frame: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Focus::Students);

    let Some(event) = app.selected_event() else {
        let message = if app.students.is_empty() {
            "Nenhum aluno carregado. Pressione [r] para atualizar."
        } else {
            "Nenhum aluno com horário fixo neste período."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(message, styles::muted_style())))
            .block(
                Block::default()
                    .title(" Alunos ")
                    .title_style(styles::muted_style())
                    .borders(Borders::ALL)
                    .border_style(styles::border_style(focused)),
            );
        frame.render_widget(paragraph, area);
        return;
    };

    let header = Row::new(vec![
        Cell::from("Nome"),
        Cell::from("Modalidade"),
        Cell::from("Status"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = event
        .grouped_students
        .iter()
        .enumerate()
        .map(|(i, student)| {
            let style = if focused && i == app.student_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new(vec![
                Cell::from(student.name.clone()),
                Cell::from(student.modality_label().to_string()),
                Cell::from(student.status_label()).style(styles::student_status_style(student.active)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(8),
    ];

    let title = format!(
        " {} · {} ",
        event.students_heading(),
        date_label(event.date())
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::highlight_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        );

    let mut state = TableState::default();
    if focused {
        state.select(Some(app.student_selection));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_label() {
        assert_eq!(date_label(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()), "Seg 03/06");
        assert_eq!(date_label(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()), "Dom 09/06");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()), "Março 2024");
        assert_eq!(month_label(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()), "Dezembro 2025");
    }
}
