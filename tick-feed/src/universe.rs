//! The instrument universe: every (product, month) pair and its running state.

use crate::config::FeedConfig;
use log::debug;
use market::InstrumentState;
use rand::Rng;
use std::collections::HashMap;

/// Ordered set of instruments keyed by symbol.
///
/// Iteration follows the configuration: products in order, then months in order.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    instruments: Vec<InstrumentState>,
    index: HashMap<String, usize>,
}

impl Universe {
    /// Lists every product for every month and draws each instrument's
    /// starting price.
    ///
    /// The starting price is the product's base price moved by a random number
    /// of ticks, scaled by the month's price adjust weight, so far months drift
    /// further from the base than near ones.
    pub fn build<R: Rng + ?Sized>(config: &FeedConfig, rng: &mut R) -> Self {
        let mut universe = Self::default();

        for product in &config.products {
            for month in &config.months {
                let shift = rng.gen_range(-10i32..=10) as f64;
                let last_price =
                    product.base_price + shift * month.price_adjust * product.price_tick;
                universe.insert(InstrumentState::new(
                    &config.exchange,
                    product,
                    month,
                    last_price,
                ));
            }
        }

        debug!("Built universe of {} instruments", universe.len());
        universe
    }

    fn insert(&mut self, state: InstrumentState) {
        self.index.insert(state.symbol.clone(), self.instruments.len());
        self.instruments.push(state);
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentState> {
        self.index.get(symbol).map(|&i| &self.instruments[i])
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut InstrumentState> {
        match self.index.get(symbol) {
            Some(&i) => Some(&mut self.instruments[i]),
            None => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InstrumentState> {
        self.instruments.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, InstrumentState> {
        self.instruments.iter_mut()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(|s| s.symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market::{DeliveryMonth, ProductConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_build_reference_universe() {
        let mut rng = StdRng::seed_from_u64(1);
        let universe = Universe::build(&FeedConfig::default(), &mut rng);

        assert_eq!(universe.len(), 30);
        let symbols: Vec<&str> = universe.symbols().collect();
        assert_eq!(symbols[0], "SHFE.cu2201");
        assert_eq!(symbols[9], "SHFE.cu2210");
        assert_eq!(symbols[10], "SHFE.au2201");
        assert_eq!(symbols[29], "SHFE.rb2210");
    }

    #[test]
    fn test_initial_state() {
        let mut rng = StdRng::seed_from_u64(2);
        let universe = Universe::build(&FeedConfig::default(), &mut rng);

        // Weight 0 keeps the first month on the base price.
        let cu = universe.get("SHFE.cu2201").unwrap();
        assert_eq!(cu.last_price, 35000.0);
        assert_eq!(cu.instrument_id, "cu2201");
        assert_eq!(cu.price_tick, 10.0);

        for state in universe.iter() {
            assert_eq!(state.trade_volume, 0);
            assert_eq!(state.close_profit, 0.0);
            assert_eq!(state.position_profit, 0);
            assert_eq!(state.valid_length, 0);
            assert_eq!(state.commission, 0.0);
        }
    }

    #[test]
    fn test_initial_price_stays_within_weighted_band() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = FeedConfig::default();
        let universe = Universe::build(&config, &mut rng);

        for product in &config.products {
            for month in &config.months {
                let symbol = format!("SHFE.{}{}", product.product_id, month.code);
                let state = universe.get(&symbol).unwrap();
                let band = 10.0 * month.price_adjust * product.price_tick + 1e-6;
                assert!((state.last_price - product.base_price).abs() <= band);
            }
        }
    }

    #[test]
    fn test_empty_config_gives_empty_universe() {
        let config = FeedConfig {
            products: vec![],
            ..FeedConfig::default()
        };
        let universe = Universe::build(&config, &mut StdRng::seed_from_u64(0));
        assert!(universe.is_empty());
        assert!(universe.get("SHFE.cu2201").is_none());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let config = FeedConfig {
            exchange: "EXCH".into(),
            products: vec![ProductConfig::new("cu", 1.0, 1000.0)],
            months: vec![DeliveryMonth::new("2201", 0.0)],
            ..FeedConfig::default()
        };
        let mut universe = Universe::build(&config, &mut StdRng::seed_from_u64(0));

        universe.get_mut("EXCH.cu2201").unwrap().trade_volume = 5;
        assert_eq!(universe.get("EXCH.cu2201").unwrap().trade_volume, 5);
    }
}
