//! Property tests for p-value recomputation.
//!
//! 1. Every recomputed p lies in [0, 1].
//! 2. One-tailed t is half the two-sided value.
//! 3. F(1, df) at t^2 matches two-sided t on df.
//! 4. r converts through t on the same df.
//! 5. A p printed as its own rounding always agrees.

use bsd_pcheck::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn p_is_a_probability(value in 0.0f64..50.0, df1 in 1u32..200, df2 in 1u32..500) {
        let tests = [
            TestStatistic::T { value, df: df1 as f64 },
            TestStatistic::F { value, df1: df1 as f64, df2: df2 as f64 },
            TestStatistic::Chi2 { value, df: df1 as f64 },
            TestStatistic::Z { value },
            TestStatistic::Q { value, df: df1 as f64 },
        ];
        for test in tests {
            let p = computed_p(&test, false).unwrap();
            prop_assert!((0.0..=1.0).contains(&p), "{:?} -> {}", test, p);
        }
    }

    #[test]
    fn one_tailed_t_is_half(value in -8.0f64..8.0, df in 1.0f64..300.0) {
        let test = TestStatistic::T { value, df };
        let two = computed_p(&test, false).unwrap();
        let one = computed_p(&test, true).unwrap();
        prop_assert!((one - two / 2.0).abs() < 1e-12);
    }

    #[test]
    fn f_with_one_numerator_df_matches_t(value in 0.0f64..6.0, df in 1u32..300) {
        let df = df as f64;
        let t = computed_p(&TestStatistic::T { value, df }, false).unwrap();
        let f = computed_p(&TestStatistic::F { value: value * value, df1: 1.0, df2: df }, false)
            .unwrap();
        prop_assert!((t - f).abs() < 1e-8, "t {} vs F {}", t, f);
    }

    #[test]
    fn r_goes_through_t(r in -0.99f64..0.99, df in 1u32..300) {
        let df = df as f64;
        let via_r = computed_p(&TestStatistic::R { value: r, df }, false).unwrap();
        let t_value = r * df.sqrt() / (1.0 - r * r).sqrt();
        let via_t = computed_p(&TestStatistic::T { value: t_value, df }, false).unwrap();
        prop_assert!((via_r - via_t).abs() < 1e-12);
    }

    #[test]
    fn own_rounding_always_agrees(value in 0.0f64..5.0, df in 1u32..100, decimals in 1u32..=4) {
        let test = TestStatistic::T { value, df: df as f64 };
        let p = computed_p(&test, false).unwrap();
        let factor = 10f64.powi(decimals as i32);
        let printed = ReportedP::new(Comparison::Eq, (p * factor).round() / factor, decimals);
        let v = check_p_value(&test, Some(&printed), &PCheckOptions::default()).unwrap();
        prop_assert_eq!(v.consistent, Some(true));
    }
}
