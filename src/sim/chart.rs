//! Background stock chart random walk

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Chart;
use crate::settings::Settings;

/// Shift the chart one sample left while playing
///
/// The new sample walks from the previous newest one; steps are wider while
/// boosted. Samples stay inside the chart band.
pub fn advance(chart: &mut Chart, rng: &mut Pcg32, settings: &Settings, playing: bool, boosted: bool) {
    if !playing {
        return;
    }
    let Some(last) = chart.last() else {
        return;
    };
    let volatility = if boosted {
        settings.chart.boosted_volatility
    } else {
        settings.chart.volatility
    };
    let margin = settings.chart.band_margin;
    let next = (last + (rng.random::<f32>() - 0.5) * volatility)
        .clamp(margin, settings.field.height - margin);
    chart.push_shift(next);
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_frozen_unless_playing() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut chart = Chart::new([300.0; 49]);
        advance(&mut chart, &mut rng, &settings, false, true);
        assert!(chart.points().all(|y| y == 300.0));
    }

    #[test]
    fn test_step_is_bounded_by_volatility() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let mut chart = Chart::new([300.0; 49]);
        advance(&mut chart, &mut rng, &settings, true, false);
        let last = chart.last().unwrap();
        assert!((last - 300.0).abs() <= 10.0);

        let mut chart = Chart::new([300.0; 49]);
        advance(&mut chart, &mut rng, &settings, true, true);
        let last = chart.last().unwrap();
        assert!((last - 300.0).abs() <= 20.0);
    }

    proptest! {
        #[test]
        fn prop_chart_stays_in_band(seed in any::<u64>(), frames in 1usize..400, boosted in any::<bool>()) {
            let settings = Settings::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut chart = Chart::new([110.0; 49]);
            for _ in 0..frames {
                advance(&mut chart, &mut rng, &settings, true, boosted);
            }
            prop_assert_eq!(chart.len(), 49);
            let newest: Vec<f32> = chart.points().skip(49usize.saturating_sub(frames)).collect();
            prop_assert!(newest.iter().all(|y| (100.0..=540.0).contains(y)));
        }
    }
}
