use std::future::Future;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use crate::common::errors::{Result, TradingError};
use crate::common::traits::BrokerGateway;
use crate::common::types::{AccountSnapshot, OrderAck, OrderRequest, Side};
use crate::config::types::AppConfig;
use crate::strategy::{
    buy_quantity, size_order, Intent, Position, PositionSource, Strategy, StrategyContext,
};

/// Settings for the polling loop
#[derive(Debug, Clone)]
pub struct TraderSettings {
    pub symbol: String,
    pub poll_interval: Duration,
    pub liquidate_on_startup: bool,
    pub position_source: PositionSource,
}

impl TraderSettings {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            poll_interval: Duration::from_millis(500),
            liquidate_on_startup: true,
            position_source: PositionSource::Belief,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            symbol: config.strategy.symbol.clone(),
            poll_interval: Duration::from_millis(config.settings.poll_interval_ms),
            liquidate_on_startup: config.settings.liquidate_on_startup,
            position_source: config.strategy.position_source,
        }
    }
}

/// What happened on one tick
#[derive(Debug)]
pub enum TickOutcome {
    /// A broker query failed; nothing was evaluated
    Skipped(TradingError),
    /// The strategy chose to hold
    Held,
    /// An order was accepted by the broker
    OrderPlaced { intent: Intent, ack: OrderAck },
    /// The intent needed an order but there was nothing to trade
    OrderSkipped { intent: Intent, reason: String },
    /// The broker rejected the order or could not be reached
    OrderFailed { intent: Intent, error: TradingError },
}

/// Running counters, logged at shutdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraderStats {
    pub ticks: u64,
    pub skipped: u64,
    pub orders_placed: u64,
    pub orders_failed: u64,
}

/// Polls a broker and feeds prices to a strategy
pub struct Trader<B, S> {
    broker: B,
    strategy: S,
    settings: TraderSettings,
    stats: TraderStats,
}

impl<B, S> Trader<B, S>
where
    B: BrokerGateway,
    S: Strategy,
{
    pub fn new(broker: B, strategy: S, settings: TraderSettings) -> Self {
        Self {
            broker,
            strategy,
            settings,
            stats: TraderStats::default(),
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn stats(&self) -> TraderStats {
        self.stats
    }

    /// Sell any position held in the symbol.
    ///
    /// Returns `Ok(None)` when there was nothing to sell.
    #[instrument(skip(self), fields(symbol = %self.settings.symbol))]
    pub async fn liquidate(&self) -> Result<Option<OrderAck>> {
        let qty = self.broker.get_position_qty(&self.settings.symbol).await?;
        if qty <= Decimal::ZERO {
            info!("No existing position to liquidate");
            return Ok(None);
        }

        let order = OrderRequest::market(&self.settings.symbol, Side::Sell, qty);
        let ack = self.broker.submit_order(&order).await?;
        info!(%qty, order_id = %ack.id, "Sold existing position");
        Ok(Some(ack))
    }

    /// Run one tick: fetch, evaluate, execute.
    ///
    /// Broker failures are reported as `TickOutcome::Skipped`; only contract
    /// violations such as `InvalidPrice` come back as errors.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        self.stats.ticks += 1;

        let account = match self.broker.query_account().await {
            Ok(account) => account,
            Err(e) => return self.skip(e),
        };

        let trade = match self.broker.get_latest_price(&self.settings.symbol).await {
            Ok(trade) => trade,
            Err(e) => return self.skip(e),
        };
        info!(symbol = %self.settings.symbol, price = %trade.price, "Current price");

        let mut ctx = StrategyContext::new(account.has_buying_power());
        if self.settings.position_source == PositionSource::Broker {
            let held = match self.broker.get_position_qty(&self.settings.symbol).await {
                Ok(qty) => qty,
                Err(e) => return self.skip(e),
            };
            let confirmed = if held > Decimal::ZERO {
                Position::Long
            } else {
                Position::Flat
            };
            ctx = ctx.with_confirmed_position(confirmed);
        }

        let intent = self.strategy.on_tick(trade.price, &ctx)?;
        let outcome = self.execute(intent, &account, trade.price).await?;

        match &outcome {
            TickOutcome::OrderPlaced { .. } => self.stats.orders_placed += 1,
            TickOutcome::OrderFailed { .. } => self.stats.orders_failed += 1,
            _ => {}
        }
        Ok(outcome)
    }

    fn skip(&mut self, error: TradingError) -> Result<TickOutcome> {
        if !error.is_transient() {
            return Err(error);
        }
        warn!(error = %error, "Skipping tick");
        self.stats.skipped += 1;
        Ok(TickOutcome::Skipped(error))
    }

    async fn execute(
        &mut self,
        intent: Intent,
        account: &AccountSnapshot,
        price: Decimal,
    ) -> Result<TickOutcome> {
        let quantity = match intent {
            Intent::Hold => return Ok(TickOutcome::Held),
            Intent::Buy => buy_quantity(account.buying_power, price)?,
            Intent::SellAll => match self.broker.get_position_qty(&self.settings.symbol).await {
                Ok(qty) => qty,
                Err(error) => {
                    error!(error = %error, "Could not read position to sell");
                    self.strategy.on_order_failed(intent);
                    return Ok(TickOutcome::OrderFailed { intent, error });
                }
            },
        };

        let Some(order) = size_order(intent, &self.settings.symbol, quantity) else {
            let reason = match intent {
                Intent::Buy => {
                    // No order means no position
                    self.strategy.on_order_failed(intent);
                    format!(
                        "not enough buying power ({}) to buy one share at {}",
                        account.buying_power, price
                    )
                }
                _ => "no shares held to sell".to_string(),
            };
            warn!(%intent, symbol = %self.settings.symbol, "Order not submitted: {}", reason);
            return Ok(TickOutcome::OrderSkipped { intent, reason });
        };

        info!(
            %intent,
            symbol = %order.symbol,
            qty = %order.qty,
            %price,
            "Submitting market order"
        );

        match self.broker.submit_order(&order).await {
            Ok(ack) => {
                info!(order_id = %ack.id, status = %ack.status, "Order accepted");
                Ok(TickOutcome::OrderPlaced { intent, ack })
            }
            Err(error) => {
                error!(error = %error, "Error placing order");
                self.strategy.on_order_failed(intent);
                Ok(TickOutcome::OrderFailed { intent, error })
            }
        }
    }

    /// Liquidate (if configured), then tick on a fixed interval until
    /// `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            broker = self.broker.broker_name(),
            strategy = self.strategy.name(),
            symbol = %self.settings.symbol,
            "Starting trader"
        );
        self.strategy.on_register();

        if self.settings.liquidate_on_startup {
            if let Err(e) = self.liquidate().await {
                error!(error = %e, "Startup liquidation failed");
            }
            sleep(self.settings.poll_interval).await;
        }

        let mut ticker = interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break Ok(());
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(error = %e, "Fatal error in trading loop");
                        break Err(e);
                    }
                }
            }
        };

        self.strategy.on_shutdown();
        info!(
            ticks = self.stats.ticks,
            skipped = self.stats.skipped,
            orders_placed = self.stats.orders_placed,
            orders_failed = self.stats.orders_failed,
            "Trader stopped"
        );
        result
    }
}
