use std::collections::BTreeSet;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use quizless_common::state::{QuizStatus, UserQuizState, UserRole};

use crate::util::sanitize_name;

/// The in-round screen: renders the last known snapshot and drives the
/// commander's start action plus answer submission.
#[derive(Debug, Clone)]
pub struct RoundScreen {
    pub snapshot: UserQuizState,
    pub busy: bool,
    pub status_message: Option<String>,
    pub show_debug: bool,
    /// Answer indices picked for the current question.
    pub selected: BTreeSet<usize>,
    pub answer_cursor: usize,
    /// Question indices already submitted this session.
    pub answered: BTreeSet<usize>,
    pub results_requested: bool,
}

impl RoundScreen {
    pub fn new(snapshot: UserQuizState) -> Self {
        Self {
            snapshot,
            busy: false,
            status_message: None,
            show_debug: false,
            selected: BTreeSet::new(),
            answer_cursor: 0,
            answered: BTreeSet::new(),
            results_requested: false,
        }
    }

    /// Replaces the cached snapshot wholesale; nothing is merged. The
    /// answer picks reset when the server moved on to a new question.
    pub fn update_snapshot(&mut self, snapshot: UserQuizState) {
        let old_question = self.snapshot.state.cur_question_index;
        if snapshot.state.cur_question_index != old_question {
            self.selected.clear();
            self.answer_cursor = 0;
        }
        self.snapshot = snapshot;
    }

    /// Only a commander of a pending round may start it.
    pub fn can_start(&self) -> bool {
        self.snapshot.state.status == QuizStatus::Pending
            && self.snapshot.user.user_role == UserRole::Commander
    }

    pub fn current_question_index(&self) -> Option<usize> {
        self.snapshot.state.cur_question_index.map(|(i, _)| i)
    }

    pub fn can_answer(&self) -> bool {
        match self.current_question_index() {
            Some(i) => {
                self.snapshot.state.status == QuizStatus::Started
                    && self.snapshot.state.cur_question.is_some()
                    && !self.answered.contains(&i)
            }
            None => false,
        }
    }

    pub fn toggle_answer(&mut self, index: usize) {
        let count = self
            .snapshot
            .state
            .cur_question
            .as_ref()
            .map(|q| q.answers.len())
            .unwrap_or(0);
        if index >= count || !self.can_answer() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    pub fn cursor_up(&mut self) {
        self.answer_cursor = self.answer_cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let count = self
            .snapshot
            .state
            .cur_question
            .as_ref()
            .map(|q| q.answers.len())
            .unwrap_or(0);
        if count > 0 && self.answer_cursor + 1 < count {
            self.answer_cursor += 1;
        }
    }

    /// One line summarizing the round, dispatched exhaustively on the
    /// status.
    pub fn status_line(&self) -> String {
        let state = &self.snapshot.state;
        let prefix = format!("Quiz \"{}\" (#{}) ", state.name, state.quiz_code);
        let suffix = match state.status {
            QuizStatus::Pending => {
                if self.snapshot.user.user_role == UserRole::Commander {
                    "is not started yet. Share the quiz code with your friends \
                     and then start the quiz."
                        .to_string()
                } else {
                    "is not started yet".to_string()
                }
            }
            QuizStatus::Scheduled => match state.starts_at {
                Some(t) => format!("will start at {}", t.format("%Y-%m-%d %H:%M:%S UTC")),
                None => "is scheduled".to_string(),
            },
            QuizStatus::Started => "is started".to_string(),
            QuizStatus::Finished => "is finished".to_string(),
            QuizStatus::Expired => "is expired".to_string(),
        };
        format!("{}{}", prefix, suffix)
    }

    /// Player names for display: the viewer always comes first, the
    /// rest keep their server order. Every name is sanitized. The bool
    /// marks the viewer's own entry.
    pub fn ordered_players(&self) -> Vec<(String, bool)> {
        let own = &self.snapshot.user.name;
        let mut out = vec![(sanitize_name(own), true)];
        for name in &self.snapshot.all_user_names {
            if name != own {
                out.push((sanitize_name(name), false));
            }
        }
        out
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(2), // Status line
                Constraint::Min(6),    // Players / question / debug
                Constraint::Length(2), // Message
                Constraint::Length(2), // Help
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "  QUIZLESS ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - quiz round"),
        ]));
        frame.render_widget(title, chunks[0]);

        let status = Paragraph::new(format!("  {}", self.status_line()))
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true });
        frame.render_widget(status, chunks[1]);

        if self.show_debug {
            self.draw_debug(frame, chunks[2]);
        } else {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[2]);
            self.draw_players(frame, body[0]);
            self.draw_question(frame, body[1]);
        }

        if self.busy {
            let msg = Paragraph::new("  Working...").style(Style::default().fg(Color::Cyan));
            frame.render_widget(msg, chunks[3]);
        } else if let Some(ref msg) = self.status_message {
            let msg = Paragraph::new(format!("  {}", msg))
                .style(Style::default().fg(Color::Red));
            frame.render_widget(msg, chunks[3]);
        }

        let mut help = String::from("  ");
        if self.can_start() {
            help.push_str("[S] Start quiz  ");
        }
        if self.can_answer() {
            help.push_str("[\u{2191}/\u{2193}] Move  [Space] Pick  [Enter] Answer  ");
        }
        if self.snapshot.state.status == QuizStatus::Finished {
            help.push_str("[R] Results  ");
        }
        help.push_str("[C] Refresh  [D] Debug  [Esc] Leave  [Q] Quit");
        let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }

    fn draw_players(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .ordered_players()
            .into_iter()
            .map(|(name, own)| {
                let style = if own {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![Span::raw(" "), Span::styled(name, style)])
            })
            .collect();
        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Players "),
        );
        frame.render_widget(widget, area);
    }

    fn draw_question(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Question ");

        let Some(question) = self.snapshot.state.cur_question.as_ref() else {
            let placeholder = match self.snapshot.state.status {
                QuizStatus::Started => "  Waiting for the next question...",
                QuizStatus::Finished => "  The quiz is over.",
                _ => "  The quiz has not started.",
            };
            let widget = Paragraph::new(placeholder)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(widget, area);
            return;
        };

        let mut lines = Vec::new();
        if let Some((i, total)) = self.snapshot.state.cur_question_index {
            lines.push(Line::from(Span::styled(
                format!(" Question {}/{}", i + 1, total),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(Span::styled(
            format!(" {}", question.question),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::raw(""));

        let answered = !self.can_answer();
        for (i, answer) in question.answers.iter().enumerate() {
            let mark = if self.selected.contains(&i) { "[x]" } else { "[ ]" };
            let cursor = if i == self.answer_cursor && !answered {
                ">"
            } else {
                " "
            };
            let style = if i == self.answer_cursor && !answered {
                Style::default().fg(Color::Yellow)
            } else if answered {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!(" {} {} {}", cursor, mark, answer),
                style,
            )));
        }
        if answered && self.snapshot.state.status == QuizStatus::Started {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                " Answer sent.",
                Style::default().fg(Color::Green),
            )));
        }

        let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
        frame.render_widget(widget, area);
    }

    // Development aid: the raw snapshot, not a stable contract.
    fn draw_debug(&self, frame: &mut Frame, area: Rect) {
        let text = serde_json::to_string_pretty(&self.snapshot)
            .unwrap_or_else(|e| format!("<unserializable: {}>", e));
        let widget = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Snapshot (debug) "),
            );
        frame.render_widget(widget, area);
    }
}
