use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};

use super::calendar::{self, date_label, month_label};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Month / filter
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, chunks[0]);
    render_period_bar(frame, app, chunks[1]);
    calendar::render(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect) {
    let title = "  Calendário de Alunos";
    let help_hint = "[?] Ajuda";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.chars().count() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_period_bar(frame: &mut Frame, app: &App, area: Rect) {
    let window = app.window();

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(month_label(app.reference_date), styles::highlight_style()),
        Span::styled(
            format!(
                "  semanas de {} a {}",
                date_label(window.start_of_week),
                date_label(window.last_projected_day())
            ),
            styles::muted_style(),
        ),
        Span::styled("  │  Fisioterapeuta: ", styles::muted_style()),
        Span::styled(app.filter_label(), styles::list_item_style()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left = match &app.status_message {
        Some(message) if message.starts_with("Erro") => {
            Span::styled(format!(" {}", message), styles::error_style())
        }
        Some(message) => Span::raw(format!(" {}", message)),
        None => Span::raw(format!(" {} alunos", app.students.len())),
    };

    let right = format!("Atualizado {} ", app.roster_age);
    let padding = (area.width as usize)
        .saturating_sub(left.content.chars().count() + right.chars().count());

    let line = Line::from(vec![
        left,
        Span::raw(" ".repeat(padding)),
        Span::styled(right, styles::muted_style()),
    ]);

    frame.render_widget(Paragraph::new(line).style(styles::status_bar_style()), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let keys = [
        ("↑/↓ j/k", "Navegar"),
        ("PgUp/PgDn", "Rolar página"),
        ("g / G", "Início / fim"),
        ("Enter/Tab", "Alternar horários / alunos"),
        ("Esc", "Voltar para horários"),
        ("p / P", "Próximo / anterior fisioterapeuta"),
        ("] / [", "Próximo / anterior mês"),
        ("t", "Voltar para hoje"),
        ("r", "Atualizar alunos"),
        ("q", "Sair"),
    ];

    let area = centered_rect_fixed(50, keys.len() as u16 + 4, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    lines.extend(keys.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(*desc, styles::help_desc_style()),
        ])
    }));

    let block = Block::default()
        .title(" Atalhos ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(40, 6, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   Deseja mesmo sair?", styles::highlight_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   ", styles::muted_style()),
            Span::styled("[S]", styles::help_key_style()),
            Span::styled(" sair, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" cancelar", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
