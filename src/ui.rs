use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{ChatApp, ChatRole};

pub fn render(app: &mut ChatApp, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat container, question control, footer
    let [header_area, chat_area, button_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_chat(app, frame, chat_area);
    render_question_button(app, frame, button_area);
    render_footer(frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" 😾 BLIP ", Style::default().fg(Color::Yellow).bold()),
        Span::styled(
            "grumpy Solana memecoin oracle",
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_chat(app: &mut ChatApp, frame: &mut Frame, area: Rect) {
    // Store chat dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Chat ");

    let mut lines: Vec<Line> = Vec::new();

    for msg in &app.messages {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "👤 You",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in msg.visible_text().lines() {
                    lines.push(Line::from(line.to_string()));
                }
                lines.push(Line::default());
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "😾 BLIP",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in msg.visible_text().lines() {
                    lines.push(Line::from(line.to_string()));
                }
                lines.push(Line::default());
            }
        }
    }

    if app.indicator_visible {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.indicator_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("😾 BLIP is typing{dots}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_question_button(app: &ChatApp, frame: &mut Frame, area: Rect) {
    let (border_color, label_style) = if app.button_enabled {
        (
            Color::Yellow,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        // Dimmed while a request is in flight
        (Color::DarkGray, Style::default().fg(Color::DarkGray))
    };

    let button_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Ask BLIP (Enter) ");

    let button = Paragraph::new(Line::from(Span::styled(
        app.button_label.clone(),
        label_style,
    )))
    .block(button_block);

    frame.render_widget(button, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled(" enter/space", Style::default().fg(Color::Yellow)),
        Span::styled(" ask  ", Style::default().fg(Color::DarkGray)),
        Span::styled("j/k", Style::default().fg(Color::Yellow)),
        Span::styled(" scroll  ", Style::default().fg(Color::DarkGray)),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(help), area);
}
