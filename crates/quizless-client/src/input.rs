use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use quizless_common::state::QuizStatus;

use crate::app::Screen;

#[derive(Debug, Clone)]
pub enum Action {
    // Global
    Quit,

    // Text input
    TypeChar(char),
    Backspace,
    Submit,

    // Navigation
    NavigateUp,
    NavigateDown,

    // Home
    SwitchTab,
    SwitchField,

    // Round
    StartQuiz,
    ToggleAnswer,
    SubmitAnswer,
    CheckNow,
    ShowResults,
    ToggleDebug,
    LeaveRound,

    // Results
    BackHome,
}

pub fn map_key(key: KeyEvent, screen: &Screen) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match screen {
        Screen::Home(_) => match key.code {
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Left | KeyCode::Right => Some(Action::SwitchTab),
            KeyCode::Tab => Some(Action::SwitchField),
            KeyCode::Up => Some(Action::NavigateUp),
            KeyCode::Down => Some(Action::NavigateDown),
            KeyCode::Char(c) => Some(Action::TypeChar(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },

        Screen::Round(s) => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::StartQuiz),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::CheckNow),
            KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::ToggleDebug),
            KeyCode::Char('r') | KeyCode::Char('R')
                if s.snapshot.state.status == QuizStatus::Finished =>
            {
                Some(Action::ShowResults)
            }
            KeyCode::Char(' ') => Some(Action::ToggleAnswer),
            KeyCode::Enter => Some(Action::SubmitAnswer),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown),
            KeyCode::Esc => Some(Action::LeaveRound),
            _ => None,
        },

        Screen::Results(_) => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Enter => Some(Action::BackHome),
            KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
    }
}
