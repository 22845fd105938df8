use super::*;

pub fn render_settings_view(frame: &mut Frame, app: &App, body: Rect) {
    let email = app.signed_in_email().unwrap_or("(no email)");
    let user_id = app
        .user
        .as_ref()
        .map(|u| u.id.to_string())
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Signed in as: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                email,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("User id:      ", Style::default().fg(Color::DarkGray)),
            Span::raw(user_id),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "[s] Sign out",
            Style::default().fg(Color::Red),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Account ")
                .padding(Padding::horizontal(2)),
        ),
        body,
    );
}
