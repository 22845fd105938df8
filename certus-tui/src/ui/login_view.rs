use super::utils::centered_rect;
use super::*;
use crate::app::LoginField;

pub fn render_login_view(frame: &mut Frame, app: &App, area: Rect) {
    let state = &app.login;
    let popup = centered_rect(60, 14, area);
    frame.render_widget(Clear, popup);

    let label_style = |field: LoginField| {
        if state.focused_field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let value_style = |field: LoginField| {
        if state.focused_field == field {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    };

    // Password is masked
    let password_display = "•".repeat(state.password.char_count());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Sign in with your work account.",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Email:    ", label_style(LoginField::Email)),
            Span::styled(state.email.value.clone(), value_style(LoginField::Email)),
        ]),
        Line::from(vec![
            Span::styled("Password: ", label_style(LoginField::Password)),
            Span::styled(password_display, value_style(LoginField::Password)),
        ]),
        Line::from(""),
    ];

    if state.submitting {
        lines.push(Line::from(Span::styled(
            "Signing in…",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    } else if let Some(err) = &state.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Switch field  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Sign in  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Quit"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(Span::styled(
                    " Certus ",
                    Style::default().fg(Color::Yellow),
                ))
                .padding(Padding::horizontal(2)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, popup);
}
