// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Property-Based Tests: Write Strategy
//!
//! The cached strategy of a level must depend only on its current
//! `(mode, color, writer present)` triple, never on how it got there.

#[cfg(test)]
mod tests {
    use levelog::{Level, Logger, MemorySink, Mode, WriteStrategy};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Change {
        Mode(Mode),
        Color(bool),
        AddWriter,
        InitWriter,
    }

    fn mode() -> impl Strategy<Value = Mode> {
        prop_oneof![Just(Mode::None), Just(Mode::Std), Just(Mode::Writer), Just(Mode::Both)]
    }

    fn change() -> impl Strategy<Value = Change> {
        prop_oneof![
            mode().prop_map(Change::Mode),
            any::<bool>().prop_map(Change::Color),
            Just(Change::AddWriter),
            Just(Change::InitWriter),
        ]
    }

    proptest! {
        /// **Property:** `WriteStrategy::resolve` is deterministic.
        #[test]
        fn test_resolve_is_pure(mode in mode(), color in any::<bool>(), writer in any::<bool>()) {
            prop_assert_eq!(
                WriteStrategy::resolve(mode, color, writer),
                WriteStrategy::resolve(mode, color, writer)
            );
        }

        /// **Property:** after any history of configuration calls the cached
        /// strategy equals a fresh resolution of the final state.
        #[test]
        fn test_cached_strategy_tracks_history(changes in prop::collection::vec(change(), 0..40)) {
            let logger = Logger::new();
            let sink = MemorySink::new();

            for change in changes {
                match change {
                    Change::Mode(mode) => { logger.set_level_mode(Level::INFO, mode); }
                    Change::Color(true) => { logger.enable_level_color(Level::INFO); }
                    Change::Color(false) => { logger.disable_level_color(Level::INFO); }
                    Change::AddWriter => { logger.add_level_writer(Level::INFO, sink.sink()); }
                    Change::InitWriter => { logger.init_writer(); }
                }
            }

            let config = logger.config(Level::INFO).unwrap();
            let expected = WriteStrategy::resolve(
                config.mode(),
                config.color_enabled(),
                config.secondary().is_some(),
            );
            prop_assert_eq!(config.strategy(), expected);
        }
    }
}
