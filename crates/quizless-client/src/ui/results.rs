use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use quizless_common::results::QuizResultsResponse;

use crate::util::sanitize_name;

/// Final ranking of a finished round, in the order the server ranked
/// the players.
#[derive(Debug, Clone)]
pub struct ResultsScreen {
    pub results: QuizResultsResponse,
    pub viewer_name: String,
}

impl ResultsScreen {
    pub fn new(results: QuizResultsResponse, viewer_name: String) -> Self {
        Self {
            results,
            viewer_name,
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(2), // Winner
                Constraint::Min(5),    // Ranking table
                Constraint::Length(2), // Help
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![Span::styled(
            format!("  {} - RESULTS", self.results.quiz_results.quiz_name),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]))
        .alignment(Alignment::Center);
        frame.render_widget(title, vertical[0]);

        if let Some(winner) = self.results.quiz_results.players.first() {
            let widget = Paragraph::new(Line::from(vec![
                Span::raw("Winner: "),
                Span::styled(
                    sanitize_name(&winner.name),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]))
            .alignment(Alignment::Center);
            frame.render_widget(widget, vertical[1]);
        }

        let header = Row::new(vec![
            Cell::from("Rank"),
            Cell::from("Player"),
            Cell::from("Correct"),
            Cell::from("Time (s)"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

        let rows: Vec<Row> = self
            .results
            .quiz_results
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let own = p.name == self.viewer_name;
                let style = if own {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(format!("  #{}", i + 1)).style(style),
                    Cell::from(sanitize_name(&p.name)).style(style),
                    Cell::from(p.correct_answers.to_string()).style(style),
                    Cell::from(format!("{:.1}", p.total_answering_time)).style(style),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(8),
            Constraint::Percentage(50),
            Constraint::Length(10),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Ranking "),
        );
        frame.render_widget(table, vertical[2]);

        let help = Paragraph::new("  [Enter] Back home  [Q] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, vertical[3]);
    }
}
