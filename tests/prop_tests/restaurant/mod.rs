use bson::{Bson, doc};
use proptest::prelude::*;
use restaurant_directory::query::{Pipeline, Stage, run_pipeline};
use restaurant_directory::restaurant::{
    AVERAGE_RATING_FIELD, GRADE_SCORE_PATH, Restaurant, average_rating,
};

fn restaurant_with_scores(scores: &[i32]) -> bson::Document {
    let grades: Vec<Bson> =
        scores.iter().map(|s| Bson::Document(doc! {"grade": "A", "score": *s})).collect();
    doc! {"name": "Prop Diner", "grades": grades}
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        cases: 128,
        .. proptest::test_runner::Config::default()
    })]

    #[test]
    fn prop_average_is_mean_or_zero(scores in proptest::collection::vec(-10_000i32..10_000, 0..40)) {
        let avg = average_rating(scores.iter().map(|s| f64::from(*s)));
        if scores.is_empty() {
            prop_assert_eq!(avg, 0.0);
        } else {
            let sum: i64 = scores.iter().map(|s| i64::from(*s)).sum();
            #[allow(clippy::cast_precision_loss)]
            let want = sum as f64 / scores.len() as f64;
            prop_assert!((avg - want).abs() < 1e-6);
            let lo = f64::from(*scores.iter().min().unwrap());
            let hi = f64::from(*scores.iter().max().unwrap());
            prop_assert!(avg >= lo - 1e-9 && avg <= hi + 1e-9);
        }
    }

    #[test]
    fn prop_read_and_aggregate_paths_agree(scores in proptest::collection::vec(0i32..100, 0..25)) {
        let doc = restaurant_with_scores(&scores);
        let read = Restaurant::from_document(&doc).unwrap().average_rating;
        let pipeline = Pipeline::new().stage(Stage::AddAverage {
            field: AVERAGE_RATING_FIELD.to_string(),
            source: GRADE_SCORE_PATH.to_string(),
        });
        let out = run_pipeline(std::slice::from_ref(&doc), &pipeline);
        let aggregated = Restaurant::aggregated_rating(&out[0]).unwrap();
        prop_assert_eq!(read, aggregated);
    }
}
