//! Runs a [`ListView`] on its own task, wired to the invalidation bus.

use shared::domain::OfficeId;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::debug;

use crate::{
    invalidation::InvalidationBus,
    list_view::{ListView, Rows, ViewState},
    pending_set::PendingWatch,
    projection::FilterState,
    rows::ListEntity,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Refresh,
    SetFilter(FilterState),
    SelectOffice(Option<OfficeId>),
    SetShowInactive(bool),
    SetSearch(Option<String>),
}

/// Owner-side handle of a spawned view. Dropping it aborts the task, so a
/// torn-down view never receives late fetch results.
pub struct ViewHandle<R> {
    commands: Option<mpsc::UnboundedSender<ViewCommand>>,
    rows: watch::Receiver<Rows<R>>,
    state: watch::Receiver<ViewState>,
    loading: PendingWatch,
    task: Option<JoinHandle<()>>,
}

impl<R> ViewHandle<R> {
    /// Returns false once the view task has stopped.
    pub fn send(&self, command: ViewCommand) -> bool {
        self.commands
            .as_ref()
            .is_some_and(|commands| commands.send(command).is_ok())
    }

    pub fn rows(&self) -> watch::Receiver<Rows<R>> {
        self.rows.clone()
    }

    pub fn state(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    pub fn loading(&self) -> PendingWatch {
        self.loading.clone()
    }

    /// Waits until the view has finished a cycle newer than `after`.
    pub async fn ready_after(&mut self, after: u64) -> Option<u64> {
        let state = self
            .state
            .wait_for(|state| {
                matches!(state, ViewState::Ready { cycle } if *cycle > after)
                    || *state == ViewState::Disposed
            })
            .await
            .ok()?;
        match *state {
            ViewState::Ready { cycle } => Some(cycle),
            _ => None,
        }
    }

    /// Stops the view after it finishes its current command and disposes it.
    pub async fn close(mut self) {
        self.commands.take();
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                debug!(%error, "view task ended abnormally");
            }
        }
    }
}

impl<R> Drop for ViewHandle<R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns `view`: an initial refresh, then a refresh for every invalidation
/// and re-projection for every filter command. The view is disposed once
/// every command sender is gone.
pub fn spawn_list_view<E: ListEntity>(
    mut view: ListView<E>,
    bus: &InvalidationBus,
) -> ViewHandle<E::Row> {
    let mut invalidations = bus.subscribe();
    let (commands, mut command_rx) = mpsc::unbounded_channel();
    let rows = view.subscribe_rows();
    let state = view.subscribe_state();
    let loading = view.loading();

    let task = tokio::spawn(async move {
        view.refresh().await;
        let mut listening = true;
        loop {
            tokio::select! {
                signal = invalidations.recv(), if listening => match signal {
                    Some(_) => {
                        debug!(resource = %E::RESOURCE, "invalidated; refreshing");
                        view.refresh().await;
                    }
                    None => {
                        debug!(resource = %E::RESOURCE, "invalidation bus closed");
                        listening = false;
                    }
                },
                command = command_rx.recv() => match command {
                    Some(command) => apply(&mut view, command).await,
                    None => break,
                },
            }
        }
        view.dispose();
    });

    ViewHandle {
        commands: Some(commands),
        rows,
        state,
        loading,
        task: Some(task),
    }
}

async fn apply<E: ListEntity>(view: &mut ListView<E>, command: ViewCommand) {
    match command {
        ViewCommand::Refresh => {
            view.refresh().await;
        }
        ViewCommand::SetFilter(filter) => view.set_filter(filter),
        ViewCommand::SelectOffice(office_id) => view.select_office(office_id),
        ViewCommand::SetShowInactive(show_inactive) => view.set_show_inactive(show_inactive),
        ViewCommand::SetSearch(search) => view.set_search(search),
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;
