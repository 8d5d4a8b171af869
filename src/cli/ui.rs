//! todo ui command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::EventDestination;
use crate::store::{TaskStore, TraceObserver};
use crate::task::RandomIds;

pub fn run(config: Config, events: Option<EventDestination>) -> Result<()> {
    if events == Some(EventDestination::Stdout) {
        return Err(Error::InvalidArgument(
            "--events - would draw over the board; pass a file path".to_string(),
        ));
    }

    let mut store = TaskStore::seeded(Box::new(RandomIds), &config.tasks.initial);
    store.subscribe(Box::new(TraceObserver));
    if let Some(destination) = events {
        store.subscribe(Box::new(destination.open()?));
    }

    tracing::debug!(tasks = store.len(), "opening board");
    crate::ui::board::run(store, config.ui)
}
