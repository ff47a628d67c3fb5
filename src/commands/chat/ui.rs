use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::ChatApp;
use crate::form::{Phase, QUESTIONS, Sender, questions};

pub fn draw(f: &mut Frame, app: &mut ChatApp) {
    let show_input = matches!(app.session.phase(), Phase::Asking(_));
    let show_card = matches!(
        app.session.phase(),
        Phase::Reviewing | Phase::ConfirmingEdit(_)
    ) && !app.session.submitted();

    let mut constraints = vec![
        Constraint::Length(3), // Header
        Constraint::Min(5),    // Transcript
    ];
    if show_input {
        constraints.push(Constraint::Length(3));
    }
    if show_card {
        constraints.push(Constraint::Length(QUESTIONS.len() as u16 + 4));
    }
    constraints.push(Constraint::Length(1)); // Status line

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_transcript(f, app, chunks[1]);

    let mut next = 2;
    if show_input {
        draw_input(f, app, chunks[next]);
        next += 1;
    }
    if show_card {
        draw_summary_card(f, app, chunks[next]);
        next += 1;
    }
    draw_status(f, app, chunks[next]);

    if let Phase::ConfirmingEdit(index) = app.session.phase() {
        draw_edit_dialog(f, index);
    }
}

fn draw_header(f: &mut Frame, app: &ChatApp, area: Rect) {
    let header = Paragraph::new(app.branding_title.as_str())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_transcript(f: &mut Frame, app: &ChatApp, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for message in app.session.transcript() {
        for part in message.text.split('\n') {
            let line = match message.sender {
                Sender::Bot => Line::from(Span::styled(
                    part.to_string(),
                    Style::default().fg(Color::Cyan),
                )),
                Sender::User => Line::from(Span::styled(
                    part.to_string(),
                    Style::default().fg(Color::Yellow),
                ))
                .alignment(Alignment::Right),
            };
            lines.push(line);
        }
        lines.push(Line::default());
    }

    if app.session.is_typing() {
        lines.push(Line::from(Span::styled(
            "\u{25cf} \u{25cf} \u{25cf}",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);

    // Keep the newest messages visible: scroll past everything that doesn't
    // fit. Word wrap can break a line earlier than the character count says,
    // so this is an estimate biased toward the tail.
    let total_height: u16 = lines.iter().map(|l| wrapped_height(l, inner.width)).sum();
    let scroll = total_height.saturating_sub(inner.height);

    let transcript = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(transcript, area);
}

fn wrapped_height(line: &Line, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let line_width = line.width() as u16;
    if line_width == 0 {
        1
    } else {
        line_width.div_ceil(width)
    }
}

fn draw_input(f: &mut Frame, app: &ChatApp, area: Rect) {
    let cursor = Span::styled("\u{258c}", Style::default().fg(Color::Cyan));

    let spans = if app.session.input().is_empty() {
        let placeholder = app
            .session
            .current_question()
            .map(|q| q.input_kind.placeholder())
            .unwrap_or(questions::INPUT_PLACEHOLDER);
        vec![
            cursor,
            Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![Span::raw(app.session.input().to_string()), cursor]
    };

    let input = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Your answer"));
    f.render_widget(input, area);
}

fn draw_summary_card(f: &mut Frame, app: &ChatApp, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for (index, question) in QUESTIONS.iter().enumerate() {
        let selected = app.review_selection == index;
        let marker = if selected { "\u{203a} " } else { "  " };
        let row_style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let answer = app.session.answer(question.key).unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}{:<14}", marker, question.label),
                row_style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", answer), row_style),
        ]));
    }

    lines.push(Line::default());

    let confirm_selected = app.review_selection == QUESTIONS.len();
    let confirm_style = if confirm_selected {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(
        Line::from(Span::styled("[ All good! ]", confirm_style)).alignment(Alignment::Center),
    );

    let card = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(card, area);
}

fn draw_edit_dialog(f: &mut Frame, index: usize) {
    let question = &QUESTIONS[index];
    let popup_area = centered_rect(50, 25, f.area());

    let text = vec![
        Line::default(),
        Line::from(format!(
            "Are you sure you want to edit \"{}\"?",
            question.label
        ))
        .alignment(Alignment::Center),
        Line::default(),
        Line::from(vec![
            Span::styled("[Y] Yes, edit", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[N] Cancel", Style::default().fg(Color::Red)),
        ])
        .alignment(Alignment::Center),
    ];

    let dialog = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm Edit")
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(dialog, popup_area);
}

fn draw_status(f: &mut Frame, app: &ChatApp, area: Rect) {
    let hint = match app.session.phase() {
        Phase::Asking(_) => "Enter send \u{00b7} Backspace delete \u{00b7} Esc quit",
        Phase::Reviewing => "\u{2191}/\u{2193} select \u{00b7} Enter edit/confirm \u{00b7} q quit",
        Phase::ConfirmingEdit(_) => "y yes \u{00b7} n cancel",
        Phase::Submitting => "Sending your details...",
        Phase::Done => "Enter quit",
    };
    let status = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
