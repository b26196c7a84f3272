//! The tick generator.
//!
//! Advances a simulated clock one second at a time. On every step each
//! instrument's state is mutated in place (random price walk, accumulators) and
//! projected into a `TickRow` together with a freshly drawn level-1 quote book.
//!
//! All randomness comes from the injected `Rng`, so a seeded generator with a
//! fixed start time always produces the same rows.

use crate::config::FeedConfig;
use crate::universe::Universe;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use market::{InstrumentState, TickRow, TickSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Interval between two samples of the same instrument, in seconds.
pub const SPAN_SECS: u32 = 1;

/// Probability denominator of an invalid (`-0.01`) `valid_length_temp` sample.
const INVALID_QUOTE_ODDS: u32 = 6;

/// Level-1 book of one sample, in ticks away from the last price.
///
/// The market spread never exceeds our own spread: our resting order sits
/// at or behind the public best price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Spreads {
    offer_bid: u32,
    offer_ask: u32,
    market_bid: u32,
    market_ask: u32,
}

impl Spreads {
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let offer_bid = rng.gen_range(1..=5);
        let offer_ask = rng.gen_range(1..=5);
        let market_bid = rng.gen_range(1..=offer_bid);
        let market_ask = rng.gen_range(1..=offer_ask);
        Self {
            offer_bid,
            offer_ask,
            market_bid,
            market_ask,
        }
    }
}

pub struct TickGenerator<R> {
    universe: Universe,
    rng: R,
    start: DateTime<Utc>,
    elapsed: u32,
    duration_secs: u32,
}

impl TickGenerator<StdRng> {
    /// Creates a generator from a configuration, starting now.
    ///
    /// Seeds from `config.seed` when present, from entropy otherwise.
    pub fn from_config(config: &FeedConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, rng, Utc::now())
    }
}

impl<R: Rng> TickGenerator<R> {
    /// Builds the universe from `config` with `rng`, then keeps `rng` for the ticks.
    pub fn new(config: &FeedConfig, mut rng: R, start: DateTime<Utc>) -> Self {
        let universe = Universe::build(config, &mut rng);
        Self {
            universe,
            rng,
            start,
            elapsed: 0,
            duration_secs: config.duration_secs,
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Simulated seconds emitted so far.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration_secs
    }

    /// Advances the clock by one second and samples every instrument.
    ///
    /// Returns `None` once the configured duration has been emitted.
    pub fn step(&mut self) -> Option<Vec<TickRow>> {
        if self.is_finished() {
            return None;
        }

        self.elapsed += 1;
        let offset = self.elapsed;
        let datetime = self.start + Duration::seconds(i64::from(offset));

        let Self { universe, rng, .. } = self;
        let rows = universe
            .iter_mut()
            .map(|state| sample(state, &mut *rng, datetime, offset))
            .collect();

        Some(rows)
    }

    /// Runs every remaining step and returns all rows in emission order.
    pub fn run(mut self) -> Vec<TickRow> {
        let rows = self.drain();
        debug!(
            "Generated {} rows over {} seconds for {} instruments",
            rows.len(),
            self.elapsed,
            self.universe.len()
        );
        rows
    }
}

impl<R: Rng> TickSource for TickGenerator<R> {
    fn next_ticks(&mut self) -> Option<Vec<TickRow>> {
        self.step()
    }
}

/// Applies one second of simulated trading to `state` and projects the result.
fn sample<R: Rng + ?Sized>(
    state: &mut InstrumentState,
    rng: &mut R,
    datetime: DateTime<Utc>,
    offset: u32,
) -> TickRow {
    let tick = state.price_tick;

    // Price walk, continuous from the previous sample.
    state.last_price += f64::from(rng.gen_range(-10i32..=10)) * tick;
    let last_price = state.last_price;

    let spreads = Spreads::draw(rng);
    let offer_bid_price1 = last_price - f64::from(spreads.offer_bid) * tick;
    let offer_ask_price1 = last_price + f64::from(spreads.offer_ask) * tick;
    let bid_price1 = last_price - f64::from(spreads.market_bid) * tick;
    let ask_price1 = last_price + f64::from(spreads.market_ask) * tick;

    let ask_volume1: u32 = rng.gen_range(1..=10);
    let bid_volume1: u32 = rng.gen_range(1..=10);
    let offer_ask_volume1 = rng.gen_range(1..=ask_volume1);
    let offer_bid_volume1 = rng.gen_range(1..=bid_volume1);

    state.trade_volume += rng.gen_range(1u64..=10);
    state.close_profit += f64::from(rng.gen_range(-1000i32..=1000)) * tick;
    state.net_position = rng.gen_range(-10..=10);
    state.position_profit += rng.gen_range(-100i64..=100) * rng.gen_range(-10i64..=10);
    state.commission += rng.gen_range(0.0..100.0);

    state.valid_length = rng.gen_range(0..=1);
    state.valid_length_temp = if rng.gen_range(0..INVALID_QUOTE_ODDS) == 0 {
        -0.01
    } else {
        f64::from(state.valid_length)
    };

    // Our own size only counts against the public level when we sit at it.
    let market_bid_volume1 = if spreads.market_bid == spreads.offer_bid {
        bid_volume1 - offer_bid_volume1
    } else {
        bid_volume1
    };
    let market_ask_volume1 = if spreads.market_ask == spreads.offer_ask {
        ask_volume1 - offer_ask_volume1
    } else {
        ask_volume1
    };

    TickRow {
        symbol: state.symbol.clone(),
        instrument_id: state.instrument_id.clone(),
        product_id: state.product_id.clone(),
        product_id_upper: state.product_id.to_uppercase(),
        delivery_date: state.delivery_date.clone(),
        price_tick: tick,
        datetime,
        timestamp: datetime.timestamp_millis(),
        offset,
        span: SPAN_SECS,
        last_price,
        bid_price1,
        ask_price1,
        bid_volume1,
        ask_volume1,
        offer_bid_price1,
        offer_ask_price1,
        offer_bid_volume1,
        offer_ask_volume1,
        close_profit: state.close_profit,
        position_profit: state.position_profit,
        trade_volume: state.trade_volume,
        net_position: state.net_position,
        commission: state.commission,
        valid_length: state.valid_length,
        valid_length_temp: state.valid_length_temp,
        valid_length_minus_tenth: f64::from(state.valid_length) - 0.1,
        is_market: 1,
        market_bid_price1: bid_price1,
        market_bid_volume1,
        market_ask_price1: ask_price1,
        market_ask_volume1,
    }
}
