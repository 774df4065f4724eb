use configuration::Costs;
use core_types::SubnetId;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Manages the state of one simulated basket: cash and per-subnet holdings.
/// Its sole responsibility is to accurately reflect state transitions from
/// rebalance executions; it never decides when to trade.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub cash: Decimal,
    /// Held quantity per subnet. Entries at or below the dust threshold are
    /// removed during rebalancing.
    pub holdings: HashMap<SubnetId, Decimal>,
    cumulative_cost: Decimal,
}

impl Portfolio {
    /// Creates a new `Portfolio` with a given amount of starting capital.
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            cash: initial_capital,
            holdings: HashMap::new(),
            cumulative_cost: Decimal::ZERO,
        }
    }

    /// Total transaction cost charged over the life of this portfolio.
    /// Monotonically non-decreasing.
    pub fn cumulative_cost(&self) -> Decimal {
        self.cumulative_cost
    }

    /// NAV at the given prices: cash plus the market value of all holdings.
    /// A subnet without a usable price contributes zero, never an error.
    pub fn portfolio_value(&self, prices: &HashMap<SubnetId, Decimal>) -> Decimal {
        let holdings_value: Decimal = self
            .holdings
            .iter()
            .map(|(subnet, quantity)| {
                *quantity * prices.get(subnet).copied().unwrap_or(Decimal::ZERO)
            })
            .sum();
        self.cash + holdings_value
    }

    /// Trades the basket toward `target_weights` and returns the transaction
    /// cost charged by this call.
    ///
    /// Every subnet in the union of targets and current holdings is netted
    /// against its target value. Trades below the minimum notional are
    /// skipped outright, and trades without a usable price are logged and
    /// skipped without charge. Executed trades debit cash by their value
    /// plus the bps cost on notional, and positions sold down to dust are
    /// removed.
    pub fn rebalance(
        &mut self,
        target_weights: &HashMap<SubnetId, Decimal>,
        prices: &HashMap<SubnetId, Decimal>,
        costs: &Costs,
    ) -> Decimal {
        let portfolio_value = self.portfolio_value(prices);

        // Net target against current value for every subnet we touch.
        let mut universe: BTreeSet<SubnetId> = target_weights.keys().copied().collect();
        universe.extend(self.holdings.keys().copied());

        let mut trades: Vec<(SubnetId, Decimal)> = Vec::new();
        for subnet in universe {
            let target_value = target_weights
                .get(&subnet)
                .map(|weight| portfolio_value * *weight)
                .unwrap_or(Decimal::ZERO);
            let current_value = self.holdings.get(&subnet).copied().unwrap_or(Decimal::ZERO)
                * prices.get(&subnet).copied().unwrap_or(Decimal::ZERO);

            let trade_value = target_value - current_value;
            if trade_value.abs() > costs.min_trade_value {
                trades.push((subnet, trade_value));
            }
        }

        // Execute the surviving trades.
        let cost_rate = costs.total_rate();
        let mut total_cost = Decimal::ZERO;
        for (subnet, trade_value) in trades {
            let price = prices.get(&subnet).copied().unwrap_or(Decimal::ZERO);
            if price.is_zero() {
                warn!("Skipping trade on subnet {}: stale or missing price", subnet);
                continue;
            }

            let cost = trade_value.abs() * cost_rate;
            total_cost += cost;

            let quantity_change = trade_value / price;
            let new_quantity =
                self.holdings.get(&subnet).copied().unwrap_or(Decimal::ZERO) + quantity_change;
            if new_quantity > costs.dust_threshold {
                self.holdings.insert(subnet, new_quantity);
            } else {
                self.holdings.remove(&subnet);
            }

            self.cash -= trade_value + cost;
        }

        self.cumulative_cost += total_cost;
        total_cost
    }
}
