use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::auth::ServerState;

/// Change feed as server-sent events; the event name is the table.
/// A lagging client skips the events it missed.
#[utoipa::path(get, path = "/admin/events", tag = "admin",
    responses((status = 200, description = "text/event-stream of table changes"), (status = 401, description = "Unauthorized")))]
pub async fn stream(State(state): State<ServerState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    let event = Event::default()
                        .event(change.table)
                        .json_data(&change)
                        .unwrap_or_else(|_| Event::default().event(change.table));
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "event subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)).text("keep-alive"))
}
