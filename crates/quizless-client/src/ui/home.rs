use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use quizless_common::topic::QuizTopic;

/// The two panels of the landing screen. Exactly one is active at any
/// time by construction; New is the initial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTab {
    Join,
    New,
}

// byte length misplaces the cursor for non-ASCII input
fn cursor_col(text: &str) -> u16 {
    text.chars().count() as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeField {
    Name,
    /// Code input on the Join tab, topic list on the New tab.
    Detail,
}

#[derive(Debug, Clone)]
pub struct HomeScreen {
    pub tab: HomeTab,
    pub name: String,
    pub code: String,
    pub topics: Vec<QuizTopic>,
    pub topic_state: ListState,
    pub active_field: HomeField,
    pub topics_loading: bool,
    pub busy: bool,
    pub error_message: Option<String>,
}

impl HomeScreen {
    pub fn new(name: String) -> Self {
        Self {
            tab: HomeTab::New,
            name,
            code: String::new(),
            topics: Vec::new(),
            topic_state: ListState::default(),
            active_field: HomeField::Name,
            topics_loading: true,
            busy: false,
            error_message: None,
        }
    }

    pub fn open_tab(&mut self, tab: HomeTab) {
        self.tab = tab;
        self.active_field = HomeField::Name;
        self.error_message = None;
    }

    pub fn switch_tab(&mut self) {
        let next = match self.tab {
            HomeTab::Join => HomeTab::New,
            HomeTab::New => HomeTab::Join,
        };
        self.open_tab(next);
    }

    pub fn switch_field(&mut self) {
        self.active_field = match self.active_field {
            HomeField::Name => HomeField::Detail,
            HomeField::Detail => HomeField::Name,
        };
    }

    /// Replaces the whole list; a repeated response never duplicates
    /// entries.
    pub fn set_topics(&mut self, topics: Vec<QuizTopic>) {
        self.topics = topics;
        self.topics_loading = false;
        match self.topic_state.selected() {
            Some(i) if i >= self.topics.len() => {
                let last = self.topics.len().checked_sub(1);
                self.topic_state.select(last);
            }
            None if !self.topics.is_empty() => self.topic_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn select_next(&mut self) {
        if self.topics.is_empty() {
            return;
        }
        let i = match self.topic_state.selected() {
            Some(i) => (i + 1) % self.topics.len(),
            None => 0,
        };
        self.topic_state.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.topics.is_empty() {
            return;
        }
        let i = match self.topic_state.selected() {
            Some(0) => self.topics.len() - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.topic_state.select(Some(i));
    }

    /// The checked entry of the exclusive topic selection.
    pub fn selected_topic_id(&self) -> Option<&str> {
        self.topic_state
            .selected()
            .and_then(|i| self.topics.get(i))
            .map(|t| t.id.as_str())
    }

    pub fn type_char(&mut self, c: char) {
        match (self.active_field, self.tab) {
            (HomeField::Name, _) => self.name.push(c),
            (HomeField::Detail, HomeTab::Join) => {
                if c.is_ascii_digit() {
                    self.code.push(c);
                }
            }
            (HomeField::Detail, HomeTab::New) => {}
        }
    }

    pub fn backspace(&mut self) {
        match (self.active_field, self.tab) {
            (HomeField::Name, _) => {
                self.name.pop();
            }
            (HomeField::Detail, HomeTab::Join) => {
                self.code.pop();
            }
            (HomeField::Detail, HomeTab::New) => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(1), // Tabs
                Constraint::Length(3), // Name field
                Constraint::Min(5),    // Tab panel
                Constraint::Length(2), // Status/Error
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
            Span::raw(" - quiz rounds with friends"),
        ]));
        frame.render_widget(title, chunks[0]);

        let tab_style = |active: bool| {
            if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            }
        };
        let tabs = Paragraph::new(Line::from(vec![
            Span::raw("  "),
            Span::styled(" Join quiz ", tab_style(self.tab == HomeTab::Join)),
            Span::raw("  "),
            Span::styled(" New quiz ", tab_style(self.tab == HomeTab::New)),
        ]));
        frame.render_widget(tabs, chunks[1]);

        let name_style = if self.active_field == HomeField::Name {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let name_input = Paragraph::new(self.name.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(name_style)
                .title(" Your Name "),
        );
        frame.render_widget(name_input, chunks[2]);

        match self.tab {
            HomeTab::Join => self.draw_join_panel(frame, chunks[3]),
            HomeTab::New => self.draw_topics_panel(frame, chunks[3]),
        }

        if self.busy {
            let status =
                Paragraph::new("  Working...").style(Style::default().fg(Color::Cyan));
            frame.render_widget(status, chunks[4]);
        } else if let Some(ref err) = self.error_message {
            let error = Paragraph::new(format!("  {}", err))
                .style(Style::default().fg(Color::Red));
            frame.render_widget(error, chunks[4]);
        }

        let help = Paragraph::new(
            "  [\u{2190}/\u{2192}] Switch tab  [Tab] Switch field  [\u{2191}/\u{2193}] Select  [Enter] Go  [Esc] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[5]);

        if self.active_field == HomeField::Name && !self.busy {
            frame.set_cursor_position((
                chunks[2].x + cursor_col(&self.name) + 1,
                chunks[2].y + 1,
            ));
        }
    }

    fn draw_join_panel(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let code_style = if self.active_field == HomeField::Detail {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let code_input = Paragraph::new(self.code.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(code_style)
                .title(" Quiz Code "),
        );
        frame.render_widget(code_input, chunks[0]);

        if self.active_field == HomeField::Detail && !self.busy {
            frame.set_cursor_position((
                chunks[0].x + cursor_col(&self.code) + 1,
                chunks[0].y + 1,
            ));
        }
    }

    fn draw_topics_panel(&self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let border_style = if self.active_field == HomeField::Detail {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Topics ");

        if self.topics_loading {
            let loading = Paragraph::new("  Loading topics...")
                .style(Style::default().fg(Color::Cyan))
                .block(block);
            frame.render_widget(loading, area);
            return;
        }
        if self.topics.is_empty() {
            let empty = Paragraph::new("  No topics available")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .topics
            .iter()
            .map(|t| ListItem::new(format!("( ) {}", t.name)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(" > ");

        let mut state = self.topic_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics() -> Vec<QuizTopic> {
        vec![
            QuizTopic {
                id: "t1".into(),
                name: "Solar System".into(),
            },
            QuizTopic {
                id: "t2".into(),
                name: "Rust Trivia".into(),
            },
            QuizTopic {
                id: "t3".into(),
                name: "Movies".into(),
            },
        ]
    }

    #[test]
    fn test_new_tab_is_the_default() {
        let screen = HomeScreen::new("Alph".into());
        assert_eq!(screen.tab, HomeTab::New);
    }

    #[test]
    fn test_tab_switching_is_exclusive() {
        let mut screen = HomeScreen::new(String::new());
        screen.open_tab(HomeTab::Join);
        assert_eq!(screen.tab, HomeTab::Join);
        screen.switch_tab();
        assert_eq!(screen.tab, HomeTab::New);
        screen.switch_tab();
        assert_eq!(screen.tab, HomeTab::Join);
    }

    #[test]
    fn test_set_topics_replaces_instead_of_appending() {
        let mut screen = HomeScreen::new(String::new());
        screen.set_topics(topics());
        screen.set_topics(topics());
        assert_eq!(screen.topics.len(), 3);
        assert_eq!(screen.topic_state.selected(), Some(0));
    }

    #[test]
    fn test_topic_selection_is_exclusive_and_carries_the_id() {
        let mut screen = HomeScreen::new(String::new());
        screen.set_topics(topics());
        assert_eq!(screen.selected_topic_id(), Some("t1"));
        screen.select_next();
        assert_eq!(screen.selected_topic_id(), Some("t2"));
        screen.select_prev();
        screen.select_prev();
        // wraps around
        assert_eq!(screen.selected_topic_id(), Some("t3"));
    }

    #[test]
    fn test_no_selection_without_topics() {
        let mut screen = HomeScreen::new(String::new());
        screen.select_next();
        assert_eq!(screen.selected_topic_id(), None);
    }

    #[test]
    fn test_cursor_column_counts_characters_not_bytes() {
        assert_eq!(cursor_col("Žofia"), 5);
        assert_eq!(cursor_col("日本語"), 3);
        assert_eq!(cursor_col(""), 0);
    }

    #[test]
    fn test_code_input_accepts_digits_only() {
        let mut screen = HomeScreen::new(String::new());
        screen.open_tab(HomeTab::Join);
        screen.switch_field();
        for c in "4a8x2".chars() {
            screen.type_char(c);
        }
        assert_eq!(screen.code, "482");
        screen.backspace();
        assert_eq!(screen.code, "48");
    }
}
