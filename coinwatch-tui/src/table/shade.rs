use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Display colour class of a cell, independent of any terminal palette.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Shade {
    #[default]
    Default,
    /// Identity cells of explicitly requested assets.
    Highlight,
    StrongFall,
    Fall,
    Flat,
    Rise,
    StrongRise,
}

/// Red to green ramp, one step per bucket.
const RAMP: [Shade; 5] = [
    Shade::StrongFall,
    Shade::Fall,
    Shade::Flat,
    Shade::Rise,
    Shade::StrongRise,
];

/// Inclusive upper bounds for current/previous ratios.
pub const RATIO_BOUNDS: [Decimal; 4] = [dec!(0.95), dec!(0.98), dec!(1.02), dec!(1.05)];

/// Inclusive upper bounds for raw percent changes.
pub const PERCENT_BOUNDS: [Decimal; 4] = [dec!(-15), dec!(-5), dec!(5), dec!(15)];

/// Shade of the first bucket whose inclusive upper bound holds `value`; values above every
/// bound take the last ramp step.
pub fn bucket(value: Decimal, bounds: &[Decimal; 4]) -> Shade {
    bounds
        .iter()
        .position(|bound| value <= *bound)
        .map_or(Shade::StrongRise, |index| RAMP[index])
}

/// Price movement since the previous fetch. No previous price, or a zero one, is unshaded.
pub fn price(current: Decimal, previous: Option<Decimal>) -> Shade {
    previous
        .and_then(|previous| current.checked_div(previous))
        .map_or(Shade::Default, |ratio| bucket(ratio, &RATIO_BOUNDS))
}

pub fn percent_change(change: Decimal) -> Shade {
    bucket(change, &PERCENT_BOUNDS)
}

/// Market cap movement: the absolute difference is bucketed on the ratio bounds.
pub fn market_cap(current: Decimal, previous: Option<Decimal>) -> Shade {
    previous.map_or(Shade::Default, |previous| {
        bucket(current - previous, &RATIO_BOUNDS)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_bucket_boundaries_are_inclusive() {
        struct TestCase {
            ratio: Decimal,
            expected: Shade,
        }

        let tests = vec![
            TestCase {
                // TC0: well below the lowest bound
                ratio: dec!(0.5),
                expected: Shade::StrongFall,
            },
            TestCase {
                // TC1: exactly on the lowest bound stays in the lower bucket
                ratio: dec!(0.95),
                expected: Shade::StrongFall,
            },
            TestCase {
                // TC2: just above the lowest bound
                ratio: dec!(0.9501),
                expected: Shade::Fall,
            },
            TestCase {
                // TC3: exactly on 0.98
                ratio: dec!(0.98),
                expected: Shade::Fall,
            },
            TestCase {
                // TC4: unchanged
                ratio: dec!(1.00),
                expected: Shade::Flat,
            },
            TestCase {
                // TC5: exactly on 1.02
                ratio: dec!(1.02),
                expected: Shade::Flat,
            },
            TestCase {
                // TC6: exactly on the highest bound
                ratio: dec!(1.05),
                expected: Shade::Rise,
            },
            TestCase {
                // TC7: above every bound
                ratio: dec!(1.0501),
                expected: Shade::StrongRise,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = bucket(test.ratio, &RATIO_BOUNDS);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_percent_change_buckets() {
        assert_eq!(percent_change(dec!(-20)), Shade::StrongFall);
        assert_eq!(percent_change(dec!(-15)), Shade::StrongFall);
        assert_eq!(percent_change(dec!(-5)), Shade::Fall);
        assert_eq!(percent_change(dec!(0)), Shade::Flat);
        assert_eq!(percent_change(dec!(5)), Shade::Flat);
        assert_eq!(percent_change(dec!(15)), Shade::Rise);
        assert_eq!(percent_change(dec!(15.01)), Shade::StrongRise);
    }

    #[test]
    fn test_price_shade() {
        assert_eq!(price(dec!(100), None), Shade::Default);
        assert_eq!(price(dec!(100), Some(Decimal::ZERO)), Shade::Default);
        assert_eq!(price(dec!(100), Some(dec!(100))), Shade::Flat);
        assert_eq!(price(dec!(90), Some(dec!(100))), Shade::StrongFall);
        assert_eq!(price(dec!(110), Some(dec!(100))), Shade::StrongRise);
    }

    #[test]
    fn test_market_cap_shades_difference() {
        assert_eq!(market_cap(dec!(1000), None), Shade::Default);
        // Unchanged cap has a difference of zero, which sits in the lowest bucket
        assert_eq!(market_cap(dec!(1000), Some(dec!(1000))), Shade::StrongFall);
        assert_eq!(market_cap(dec!(1001), Some(dec!(1000))), Shade::Flat);
        assert_eq!(market_cap(dec!(999), Some(dec!(1000))), Shade::StrongFall);
        assert_eq!(market_cap(dec!(1500), Some(dec!(1000))), Shade::StrongRise);
    }
}
