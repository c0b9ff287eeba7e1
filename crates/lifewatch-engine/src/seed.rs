//! Initial board population.
//!
//! Random boards use a [`StdRng`] seeded from `seed.rng_seed` (or a fresh
//! seed drawn from the thread RNG). The seed in use is logged and returned
//! so a run can be replayed with `LIFEWATCH_SEED`.

use lifewatch_core::config::{SeedConfig, SeedMode};
use lifewatch_core::session::Session;
use lifewatch_grid::patterns;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::EngineError;

/// Populate `session` according to `config`. Returns the RNG seed used, if
/// the board was randomized.
///
/// # Errors
///
/// Returns [`EngineError::Grid`] for an unknown or oversized pattern and
/// [`EngineError::Session`] if the session is no longer editable.
pub fn seed_session(session: &mut Session, config: &SeedConfig) -> Result<Option<u64>, EngineError> {
    match config.mode {
        SeedMode::Random => {
            let seed = config.rng_seed.unwrap_or_else(|| rand::rng().random());
            let mut rng = StdRng::seed_from_u64(seed);
            session.randomize_with_density(&mut rng, config.density)?;
            info!(
                rng_seed = seed,
                density = config.density,
                live_cells = session.live_cells(),
                "Board randomized"
            );
            Ok(Some(seed))
        }
        SeedMode::Pattern => {
            let pattern = patterns::find(&config.pattern)?;
            session.center_pattern(pattern)?;
            info!(pattern = pattern.name, live_cells = session.live_cells(), "Pattern placed");
            Ok(None)
        }
        SeedMode::Empty => {
            session.clear()?;
            info!("Board left empty");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifewatch_core::detector::DetectionOptions;

    use super::*;

    fn session() -> Session {
        Session::new(12, 12, 100, DetectionOptions::default()).unwrap()
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let config = SeedConfig {
            rng_seed: Some(7),
            ..SeedConfig::default()
        };
        let mut a = session();
        let mut b = session();
        assert_eq!(seed_session(&mut a, &config).unwrap(), Some(7));
        assert_eq!(seed_session(&mut b, &config).unwrap(), Some(7));
        assert_eq!(a.current(), b.current());
    }

    #[test]
    fn missing_seed_is_drawn_and_reported() {
        let mut a = session();
        assert!(seed_session(&mut a, &SeedConfig::default()).unwrap().is_some());
    }

    #[test]
    fn pattern_mode_centers_the_pattern() {
        let config = SeedConfig {
            mode: SeedMode::Pattern,
            pattern: "blinker".to_owned(),
            ..SeedConfig::default()
        };
        let mut s = session();
        assert_eq!(seed_session(&mut s, &config).unwrap(), None);
        assert_eq!(s.live_cells(), 3);
        assert!(s.current().get(5, 5).unwrap());
    }

    #[test]
    fn unknown_pattern_is_an_error() {
        let config = SeedConfig {
            mode: SeedMode::Pattern,
            pattern: "unicorn".to_owned(),
            ..SeedConfig::default()
        };
        assert!(matches!(
            seed_session(&mut session(), &config),
            Err(EngineError::Grid { .. })
        ));
    }

    #[test]
    fn empty_mode_clears() {
        let config = SeedConfig {
            mode: SeedMode::Empty,
            ..SeedConfig::default()
        };
        let mut s = session();
        s.toggle_cell(0, 0).unwrap();
        seed_session(&mut s, &config).unwrap();
        assert_eq!(s.live_cells(), 0);
    }

    #[test]
    fn started_session_cannot_be_seeded() {
        let mut s = session();
        s.start().unwrap();
        assert!(matches!(
            seed_session(&mut s, &SeedConfig::default()),
            Err(EngineError::Session { .. })
        ));
    }
}
