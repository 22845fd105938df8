use super::utils::centered_rect;
use super::*;

pub fn render_confirm_dialog(frame: &mut Frame, app: &App) {
    let Some(prompt) = app.confirm.prompt() else {
        return;
    };

    let area = centered_rect(56, 8, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            prompt.message.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Confirm", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[n] Cancel", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", prompt.title))
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
