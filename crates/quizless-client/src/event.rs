use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

use quizless_common::results::QuizResultsResponse;
use quizless_common::state::UserQuizState;
use quizless_common::topic::QuizTopic;

use crate::api::ApiError;

/// Completion of one HTTP request, delivered exactly once to the UI
/// loop by the task that ran it.
#[derive(Debug)]
pub enum ApiOutcome {
    Topics(Result<Vec<QuizTopic>, ApiError>),
    Started(Result<UserQuizState, ApiError>),
    Joined(Result<UserQuizState, ApiError>),
    Scheduled(Result<UserQuizState, ApiError>),
    StatusChecked(Result<UserQuizState, ApiError>),
    Answered(Result<UserQuizState, ApiError>),
    Results(Result<QuizResultsResponse, ApiError>),
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Api(ApiOutcome),
    Tick,
}

pub async fn event_loop(event_tx: mpsc::Sender<AppEvent>) {
    let mut key_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    loop {
        let event = tokio::select! {
            Some(Ok(Event::Key(key))) = key_stream.next() => {
                AppEvent::Key(key)
            }
            _ = tick_interval.tick() => {
                AppEvent::Tick
            }
        };

        if event_tx.send(event).await.is_err() {
            break;
        }
    }
}
