//! Timer-driven kitchen display.
//!
//! A [`LiveOrderView`] owns every timer that touches its board: one repeating
//! task refreshing elapsed-time labels for all orders, and one one-shot task per
//! order that reaches a terminal status, removing it after the configured delay.
//! Dropping the view aborts all of them, so no timer outlives the view.

use crate::{
    core::{
        clock::Clock,
        orders::{OrderBoard, StaffAction},
    },
    errors::{Error, Result},
    models::{LiveOrder, OrderStatus},
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::RwLock,
    task::{JoinHandle, JoinSet},
    time::Instant,
};
use tracing::{debug, trace};

/// Timer settings for the kitchen display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderTimings {
    /// How often elapsed-time labels are refreshed
    pub tick_interval_ms: u64,
    /// How long a completed or cancelled order stays visible
    pub removal_delay_ms: u64,
}

impl Default for OrderTimings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            removal_delay_ms: 3_000,
        }
    }
}

impl OrderTimings {
    /// Rejects a zero tick interval, which the ticker cannot run at.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when `tick_interval_ms` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(Error::validation("order tick interval must be at least 1 ms"));
        }
        Ok(())
    }

    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub const fn removal_delay(&self) -> Duration {
        Duration::from_millis(self.removal_delay_ms)
    }
}

/// A mounted kitchen display. Timers start on [`LiveOrderView::mount`] and stop on drop.
#[derive(Debug)]
pub struct LiveOrderView {
    board: Arc<RwLock<OrderBoard>>,
    timings: OrderTimings,
    ticker: JoinHandle<()>,
    removals: JoinSet<()>,
}

impl LiveOrderView {
    /// Puts `orders` on a fresh board and starts the elapsed-time ticker.
    ///
    /// Elapsed labels are computed once immediately and then on every tick.
    /// Rejected and completed orders are removed `removal_delay` after the
    /// staff action. All timers belong to the view and are cancelled when it
    /// is dropped or [`unmount`](Self::unmount)ed. Must be called from within a
    /// tokio runtime.
    ///
    /// # Arguments
    /// * `orders` - Orders shown when the display opens
    /// * `clock` - Wall clock used for elapsed-time labels
    /// * `timings` - Tick interval and removal delay
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if two orders share an id
    /// or the tick interval is zero.
    pub fn mount(
        orders: Vec<LiveOrder>,
        clock: Arc<dyn Clock>,
        timings: OrderTimings,
    ) -> Result<Self> {
        timings.validate()?;
        let mut board = OrderBoard::new();
        for order in orders {
            board.add(order)?;
        }
        board.refresh_elapsed(clock.now());

        let board = Arc::new(RwLock::new(board));
        let ticker = tokio::spawn(run_ticker(
            Arc::clone(&board),
            clock,
            timings.tick_interval(),
        ));

        debug!("Kitchen display mounted");
        Ok(Self {
            board,
            timings,
            ticker,
            removals: JoinSet::new(),
        })
    }

    /// Shared handle to the board, for readers that outlive a single call.
    #[must_use]
    pub fn board(&self) -> Arc<RwLock<OrderBoard>> {
        Arc::clone(&self.board)
    }

    /// Snapshot of the orders currently shown.
    pub async fn orders(&self) -> Vec<LiveOrder> {
        self.board.read().await.orders().to_vec()
    }

    pub async fn get(&self, order_id: &str) -> Option<LiveOrder> {
        self.board.read().await.get(order_id).cloned()
    }

    /// Adds an incoming order to the display.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the id is already shown.
    pub async fn add(&self, order: LiveOrder) -> Result<()> {
        self.board.write().await.add(order)
    }

    /// Staff "Accept": `pending -> preparing`.
    ///
    /// # Errors
    /// See [`OrderBoard::apply`].
    pub async fn accept(&mut self, order_id: &str) -> Result<OrderStatus> {
        self.act(order_id, StaffAction::Accept).await
    }

    /// Staff "Reject": `pending -> cancelled`, removed after the delay.
    ///
    /// # Errors
    /// See [`OrderBoard::apply`].
    pub async fn reject(&mut self, order_id: &str) -> Result<OrderStatus> {
        self.act(order_id, StaffAction::Reject).await
    }

    /// `preparing -> ready`.
    ///
    /// # Errors
    /// See [`OrderBoard::apply`].
    pub async fn mark_ready(&mut self, order_id: &str) -> Result<OrderStatus> {
        self.act(order_id, StaffAction::MarkReady).await
    }

    /// Staff "Complete": `preparing`/`ready -> completed`, removed after the delay.
    ///
    /// # Errors
    /// See [`OrderBoard::apply`].
    pub async fn complete(&mut self, order_id: &str) -> Result<OrderStatus> {
        self.act(order_id, StaffAction::Complete).await
    }

    /// Stops every timer. Same as dropping the view.
    pub fn unmount(self) {}

    async fn act(&mut self, order_id: &str, action: StaffAction) -> Result<OrderStatus> {
        let status = self.board.write().await.apply(order_id, action)?;
        if status.is_terminal() {
            self.schedule_removal(order_id);
        }
        Ok(status)
    }

    fn schedule_removal(&mut self, order_id: &str) {
        // reap finished removals so the set only tracks pending ones
        while self.removals.try_join_next().is_some() {}

        let board = Arc::clone(&self.board);
        let order_id = order_id.to_string();
        let deadline = Instant::now() + self.timings.removal_delay();

        self.removals.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if board.write().await.remove_settled(&order_id).is_some() {
                debug!("Order {order_id} removed from display");
            }
        });
    }
}

impl Drop for LiveOrderView {
    fn drop(&mut self) {
        self.ticker.abort();
        self.removals.abort_all();
        debug!("Kitchen display unmounted");
    }
}

async fn run_ticker(board: Arc<RwLock<OrderBoard>>, clock: Arc<dyn Clock>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let now = clock.now();
        board.write().await.refresh_elapsed(now);
        trace!("Refreshed elapsed time at {now}");
    }
}
