// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Live feed.
//!
//! Reads a snapshot, then keeps it current from the push channel. The
//! reconciler is bound before the print handlers so totals printed after
//! an event already include it.

use std::time::Duration;

use natura_client::SharedReconciler;
use natura_core::{EventKind, Observation, RecordId};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::display::{format_event, format_stats};
use crate::error::{Error, Result};
use crate::session::Session;

/// Why the watch loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Stop {
    Interrupted,
    ChannelFailed(String),
    SessionExpired,
}

impl Stop {
    pub(crate) fn into_result(self) -> Result<()> {
        match self {
            Stop::Interrupted => Ok(()),
            Stop::ChannelFailed(reason) => Err(Error::WatchStopped(reason)),
            Stop::SessionExpired => Err(Error::SessionExpired),
        }
    }
}

pub async fn run(
    session: &Session,
    limit: usize,
    user: Option<RecordId>,
    resync: Option<u64>,
) -> Result<()> {
    let observations = session.observations();
    let reconciler: SharedReconciler<Observation> = SharedReconciler::new();
    reconciler.initialize(observations.list(limit).await?);
    println!("Watching {} observations (Ctrl-C to stop)", reconciler.len());
    if let Some(user_id) = user {
        println!("  {}", format_stats(&reconciler.stats_for(user_id)));
    }

    let mut channel = session.observation_channel()?;
    reconciler.bind(&channel);
    for kind in EventKind::ALL {
        let feed = reconciler.clone();
        channel.on(kind, move |message| {
            println!("{}", format_event(message));
            if let Some(user_id) = user {
                println!("  {}", format_stats(&feed.stats_for(user_id)));
            }
        });
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let channel_tx = tx.clone();
    channel.on_error(move |error| {
        let _ = channel_tx.send(Stop::ChannelFailed(error.to_string()));
    });
    let listener = session.auth_events().subscribe(move |failure| {
        tracing::warn!(%failure, "session lost");
        let _ = tx.send(Stop::SessionExpired);
        Ok(())
    });

    if let Err(e) = channel.connect().await {
        session.auth_events().unsubscribe(listener);
        return Err(e.into());
    }

    let mut resync_timer = resync.map(|secs| {
        let period = Duration::from_secs(secs);
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    });

    let stop = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break Stop::Interrupted,
            reason = rx.recv() => break reason.unwrap_or(Stop::Interrupted),
            _ = tick(&mut resync_timer) => {
                match observations.list(limit).await {
                    Ok(snapshot) => {
                        reconciler.initialize(snapshot);
                        tracing::debug!(count = reconciler.len(), "feed resynced");
                    }
                    Err(e) => tracing::warn!(error = %e, "feed resync failed"),
                }
            }
        }
    };

    session.auth_events().unsubscribe(listener);
    channel.disconnect().await?;
    stop.into_result()
}

/// Wait for the next resync, or forever when resync is off.
async fn tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
