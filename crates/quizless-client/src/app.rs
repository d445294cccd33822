use std::io;
use std::time::{Duration, Instant};

use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::api::{ApiClient, SCHEDULE_DELAY_SECONDS};
use crate::event::{self, ApiOutcome, AppEvent};
use crate::input::{self, Action};
use crate::storage::{FileStore, LocalState};
use crate::ui::home::{HomeScreen, HomeField, HomeTab};
use crate::ui::results::ResultsScreen;
use crate::ui::round::RoundScreen;
use crate::util;

use quizless_common::state::QuizStatus;

#[derive(Debug)]
pub enum Screen {
    Home(HomeScreen),
    Round(RoundScreen),
    Results(ResultsScreen),
}

pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: ApiClient,
    mut local: LocalState<FileStore>,
) -> anyhow::Result<()> {
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(64);
    tokio::spawn(event::event_loop(event_tx.clone()));

    // Resume the cached round if there is one; a corrupt snapshot is
    // fatal here, same as a failed page initialization.
    let mut screen = match local.read_quiz_state()? {
        Some(snapshot) => {
            local.set_user_name(&snapshot.user.name)?;
            Screen::Round(RoundScreen::new(snapshot))
        }
        None => {
            fetch_topics(&api, &event_tx);
            Screen::Home(HomeScreen::new(local.user_name()?.to_string()))
        }
    };

    let mut last_poll = Instant::now();
    let mut running = true;

    while running {
        terminal.draw(|frame| match &screen {
            Screen::Home(s) => s.draw(frame),
            Screen::Round(s) => s.draw(frame),
            Screen::Results(s) => s.draw(frame),
        })?;

        let event = match event_rx.recv().await {
            Some(e) => e,
            None => break,
        };

        let action = match event {
            AppEvent::Key(key) => input::map_key(key, &screen),
            AppEvent::Api(outcome) => {
                handle_outcome(outcome, &mut screen, &mut local)?;
                None
            }
            AppEvent::Tick => {
                poll_round(&mut screen, &api, &event_tx, &mut last_poll);
                None
            }
        };

        if let Some(action) = action {
            match action {
                Action::Quit => running = false,

                Action::TypeChar(c) => {
                    if let Screen::Home(s) = &mut screen {
                        s.type_char(c);
                    }
                }
                Action::Backspace => {
                    if let Screen::Home(s) = &mut screen {
                        s.backspace();
                    }
                }
                Action::SwitchTab => {
                    if let Screen::Home(s) = &mut screen {
                        s.switch_tab();
                    }
                }
                Action::SwitchField => {
                    if let Screen::Home(s) = &mut screen {
                        s.switch_field();
                    }
                }
                Action::NavigateUp => match &mut screen {
                    Screen::Home(s) => {
                        if s.tab == HomeTab::New && s.active_field == HomeField::Detail {
                            s.select_prev();
                        }
                    }
                    Screen::Round(s) => s.cursor_up(),
                    _ => {}
                },
                Action::NavigateDown => match &mut screen {
                    Screen::Home(s) => {
                        if s.tab == HomeTab::New && s.active_field == HomeField::Detail {
                            s.select_next();
                        }
                    }
                    Screen::Round(s) => s.cursor_down(),
                    _ => {}
                },

                Action::Submit => {
                    if let Screen::Home(s) = &mut screen {
                        submit_home(s, &api, &event_tx);
                    }
                }

                Action::StartQuiz => {
                    if let Screen::Round(s) = &mut screen {
                        if s.can_start() && !s.busy {
                            s.busy = true;
                            s.status_message = None;
                            let api = api.clone();
                            let tx = event_tx.clone();
                            let code = s.snapshot.state.quiz_code;
                            let token = s.snapshot.user.user_token.clone();
                            tokio::spawn(async move {
                                let result = api
                                    .schedule_quiz(code, &token, SCHEDULE_DELAY_SECONDS)
                                    .await;
                                let _ = tx
                                    .send(AppEvent::Api(ApiOutcome::Scheduled(result)))
                                    .await;
                            });
                        }
                    }
                }

                Action::ToggleAnswer => {
                    if let Screen::Round(s) = &mut screen {
                        s.toggle_answer(s.answer_cursor);
                    }
                }

                Action::SubmitAnswer => {
                    if let Screen::Round(s) = &mut screen {
                        submit_answer(s, &api, &event_tx);
                    }
                }

                Action::CheckNow => {
                    if let Screen::Round(s) = &mut screen {
                        if !s.busy {
                            s.busy = true;
                            last_poll = Instant::now();
                            fetch_status(s, &api, &event_tx);
                        }
                    }
                }

                Action::ShowResults => {
                    if let Screen::Round(s) = &mut screen {
                        if !s.busy {
                            s.busy = true;
                            s.results_requested = true;
                            fetch_results(s.snapshot.state.quiz_code, &api, &event_tx);
                        }
                    }
                }

                Action::ToggleDebug => {
                    if let Screen::Round(s) = &mut screen {
                        s.show_debug = !s.show_debug;
                    }
                }

                Action::LeaveRound | Action::BackHome => {
                    local.store_quiz_state(None)?;
                    fetch_topics(&api, &event_tx);
                    screen = Screen::Home(HomeScreen::new(local.user_name()?.to_string()));
                }
            }
        }
    }

    Ok(())
}

fn fetch_topics(api: &ApiClient, event_tx: &mpsc::Sender<AppEvent>) {
    let api = api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.quiz_topics().await;
        let _ = tx.send(AppEvent::Api(ApiOutcome::Topics(result))).await;
    });
}

fn fetch_status(screen: &RoundScreen, api: &ApiClient, event_tx: &mpsc::Sender<AppEvent>) {
    let api = api.clone();
    let tx = event_tx.clone();
    let code = screen.snapshot.state.quiz_code;
    let token = screen.snapshot.user.user_token.clone();
    tokio::spawn(async move {
        let result = api.check_status(code, &token).await;
        let _ = tx
            .send(AppEvent::Api(ApiOutcome::StatusChecked(result)))
            .await;
    });
}

fn fetch_results(quiz_code: u32, api: &ApiClient, event_tx: &mpsc::Sender<AppEvent>) {
    let api = api.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let result = api.quiz_results(quiz_code).await;
        let _ = tx.send(AppEvent::Api(ApiOutcome::Results(result))).await;
    });
}

fn submit_home(s: &mut HomeScreen, api: &ApiClient, event_tx: &mpsc::Sender<AppEvent>) {
    if s.busy {
        return;
    }
    if s.name.trim().is_empty() {
        s.error_message = Some("Please enter a name".into());
        return;
    }
    let name = s.name.trim().to_string();

    match s.tab {
        HomeTab::New => {
            let Some(topic_id) = s.selected_topic_id().map(str::to_string) else {
                s.error_message = Some("Please select a topic".into());
                return;
            };
            s.busy = true;
            s.error_message = None;
            let api = api.clone();
            let tx = event_tx.clone();
            tokio::spawn(async move {
                let result = api.start_quiz(&topic_id, &name).await;
                let _ = tx.send(AppEvent::Api(ApiOutcome::Started(result))).await;
            });
        }
        HomeTab::Join => {
            let Some(code) = util::parse_quiz_code(&s.code) else {
                s.error_message = Some("Please enter a numeric quiz code".into());
                return;
            };
            s.busy = true;
            s.error_message = None;
            let api = api.clone();
            let tx = event_tx.clone();
            tokio::spawn(async move {
                let result = api.join_quiz(code, &name).await;
                let _ = tx.send(AppEvent::Api(ApiOutcome::Joined(result))).await;
            });
        }
    }
}

fn submit_answer(s: &mut RoundScreen, api: &ApiClient, event_tx: &mpsc::Sender<AppEvent>) {
    if s.busy || !s.can_answer() {
        return;
    }
    if s.selected.is_empty() {
        s.status_message = Some("Pick at least one answer".into());
        return;
    }
    let Some(index) = s.current_question_index() else {
        return;
    };
    // marked up front; a failed submission stays terminal, as every
    // other failed action does
    s.answered.insert(index);
    s.busy = true;
    s.status_message = None;

    let api = api.clone();
    let tx = event_tx.clone();
    let code = s.snapshot.state.quiz_code;
    let token = s.snapshot.user.user_token.clone();
    let answer: Vec<usize> = s.selected.iter().copied().collect();
    tokio::spawn(async move {
        let result = api.give_answer(code, &token, index, answer).await;
        let _ = tx.send(AppEvent::Api(ApiOutcome::Answered(result))).await;
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollStep {
    Wait,
    FetchStatus,
    FetchResults,
}

/// What the tick should do for a round in the given shape: nothing
/// while a request is in flight, fetch the results exactly once for a
/// finished round, and re-check a live one when the pace allows. The
/// server's `updates_in_seconds` hint sets the pace when present,
/// clamped to 1..=10 seconds.
fn poll_step(
    status: QuizStatus,
    busy: bool,
    results_requested: bool,
    elapsed: Duration,
    updates_hint: Option<u32>,
) -> PollStep {
    if busy {
        return PollStep::Wait;
    }
    if status == QuizStatus::Finished && !results_requested {
        return PollStep::FetchResults;
    }
    if !status.is_live() {
        return PollStep::Wait;
    }
    let interval = updates_hint.unwrap_or(3).clamp(1, 10) as u64;
    if elapsed >= Duration::from_secs(interval) {
        PollStep::FetchStatus
    } else {
        PollStep::Wait
    }
}

fn poll_round(
    screen: &mut Screen,
    api: &ApiClient,
    event_tx: &mpsc::Sender<AppEvent>,
    last_poll: &mut Instant,
) {
    let Screen::Round(s) = screen else {
        return;
    };

    match poll_step(
        s.snapshot.state.status,
        s.busy,
        s.results_requested,
        last_poll.elapsed(),
        s.snapshot.state.updates_in_seconds,
    ) {
        PollStep::Wait => {}
        PollStep::FetchResults => {
            s.busy = true;
            s.results_requested = true;
            fetch_results(s.snapshot.state.quiz_code, api, event_tx);
        }
        PollStep::FetchStatus => {
            *last_poll = Instant::now();
            s.busy = true;
            fetch_status(s, api, event_tx);
        }
    }
}

/// Route one request completion back into the screen that asked for
/// it. A completion that arrives after the screen moved on is dropped.
fn handle_outcome(
    outcome: ApiOutcome,
    screen: &mut Screen,
    local: &mut LocalState<FileStore>,
) -> anyhow::Result<()> {
    match outcome {
        ApiOutcome::Topics(result) => {
            if let Screen::Home(s) = screen {
                match result {
                    Ok(topics) => s.set_topics(topics),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to load topics");
                        s.topics_loading = false;
                        s.error_message = Some(e.user_message());
                    }
                }
            }
        }

        ApiOutcome::Started(result) | ApiOutcome::Joined(result) => {
            if let Screen::Home(s) = screen {
                match result {
                    Ok(snapshot) => {
                        local.set_user_name(&snapshot.user.name)?;
                        local.store_quiz_state(Some(&snapshot))?;
                        *screen = Screen::Round(RoundScreen::new(snapshot));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "quiz start/join failed");
                        s.busy = false;
                        s.error_message = Some(e.user_message());
                    }
                }
            }
        }

        ApiOutcome::Scheduled(result)
        | ApiOutcome::StatusChecked(result)
        | ApiOutcome::Answered(result) => {
            if let Screen::Round(s) = screen {
                s.busy = false;
                match result {
                    Ok(snapshot) => {
                        local.set_user_name(&snapshot.user.name)?;
                        local.store_quiz_state(Some(&snapshot))?;
                        s.status_message = None;
                        s.update_snapshot(snapshot);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "round request failed");
                        s.status_message = Some(e.user_message());
                    }
                }
            }
        }

        ApiOutcome::Results(result) => {
            if let Screen::Round(s) = screen {
                s.busy = false;
                match result {
                    Ok(results) => {
                        let viewer = s.snapshot.user.name.clone();
                        *screen = Screen::Results(ResultsScreen::new(results, viewer));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to load results");
                        s.status_message = Some(e.user_message());
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_no_poll_while_a_request_is_in_flight() {
        for status in [
            QuizStatus::Pending,
            QuizStatus::Scheduled,
            QuizStatus::Started,
            QuizStatus::Finished,
        ] {
            assert_eq!(
                poll_step(status, true, false, secs(60), None),
                PollStep::Wait
            );
        }
    }

    #[test]
    fn test_live_round_polls_once_the_interval_passed() {
        assert_eq!(
            poll_step(QuizStatus::Started, false, false, secs(2), None),
            PollStep::Wait
        );
        assert_eq!(
            poll_step(QuizStatus::Started, false, false, secs(3), None),
            PollStep::FetchStatus
        );
    }

    #[test]
    fn test_server_hint_sets_the_pace() {
        assert_eq!(
            poll_step(QuizStatus::Scheduled, false, false, secs(5), Some(8)),
            PollStep::Wait
        );
        assert_eq!(
            poll_step(QuizStatus::Scheduled, false, false, secs(8), Some(8)),
            PollStep::FetchStatus
        );
    }

    #[test]
    fn test_hint_is_clamped_to_a_sane_range() {
        // a zero hint must not busy-loop the backend
        assert_eq!(
            poll_step(QuizStatus::Started, false, false, secs(0), Some(0)),
            PollStep::Wait
        );
        assert_eq!(
            poll_step(QuizStatus::Started, false, false, secs(1), Some(0)),
            PollStep::FetchStatus
        );
        // a huge hint must not stall the round view
        assert_eq!(
            poll_step(QuizStatus::Started, false, false, secs(10), Some(600)),
            PollStep::FetchStatus
        );
    }

    #[test]
    fn test_finished_round_fetches_results_exactly_once() {
        assert_eq!(
            poll_step(QuizStatus::Finished, false, false, secs(0), None),
            PollStep::FetchResults
        );
        assert_eq!(
            poll_step(QuizStatus::Finished, false, true, secs(60), None),
            PollStep::Wait
        );
    }

    #[test]
    fn test_expired_round_is_left_alone() {
        assert_eq!(
            poll_step(QuizStatus::Expired, false, false, secs(60), None),
            PollStep::Wait
        );
    }
}
