use demofit::similarity::{compare_demographics, normalize, Method};
use rstest::rstest;
use std::str::FromStr;

#[rstest]
#[case(Method::L1)]
#[case(Method::L2)]
#[case(Method::Cosine)]
#[case(Method::Js)]
fn self_similarity_is_maximal(#[case] method: Method) {
    let v = [0.2, 0.5, 0.3, 0.0, 1.7];
    let sim = compare_demographics(&v, &v, method);
    assert!((sim - 1.0).abs() < 1e-9, "{method}: {sim}");
}

#[rstest]
#[case(Method::L1)]
#[case(Method::L2)]
#[case(Method::Cosine)]
#[case(Method::Js)]
fn zero_actual_scores_zero(#[case] method: Method) {
    let expected = [0.6, 0.4];
    let actual = [0.0, 0.0];
    assert_eq!(compare_demographics(&expected, &actual, method), 0.0);
}

#[rstest]
#[case(Method::L1)]
#[case(Method::Js)]
fn both_zero_is_not_a_miss(#[case] method: Method) {
    // An all-zero target with an all-zero reconstruction is a perfect match
    // of nothing: the normalize step is a no-op and the distance is zero.
    let sim = compare_demographics(&[0.0, 0.0], &[0.0, 0.0], method);
    assert!((sim - 1.0).abs() < 1e-9);
}

#[test]
fn l1_disjoint_vectors_score_zero() {
    assert_eq!(compare_demographics(&[1.0, 0.0], &[0.0, 1.0], Method::L1), 0.0);
}

#[test]
fn l2_disjoint_vectors_score_zero() {
    // Normalized unit vectors at right angles are √2 apart, the L2 maximum.
    let sim = compare_demographics(&[1.0, 0.0], &[0.0, 1.0], Method::L2);
    assert!(sim.abs() < 1e-9);
}

#[test]
fn cosine_orthogonal_vectors_score_zero() {
    assert_eq!(
        compare_demographics(&[1.0, 0.0], &[0.0, 1.0], Method::Cosine),
        0.0
    );
}

#[test]
fn length_mismatch_is_reported_not_fatal() {
    assert_eq!(
        compare_demographics(&[0.5, 0.5], &[0.5, 0.3, 0.2], Method::Js),
        0.0
    );
}

#[test]
fn unknown_method_is_rejected() {
    assert!(Method::from_str("xyz").is_err());
    assert!(Method::from_str("").is_err());
}

#[test]
fn method_names_round_trip() {
    for method in [Method::L1, Method::L2, Method::Cosine, Method::Js] {
        assert_eq!(Method::from_str(&method.to_string()).unwrap(), method);
    }
    assert_eq!(Method::from_str("js").unwrap(), Method::Js);
    assert_eq!(Method::default(), Method::Js);
}

#[rstest]
#[case(Method::L1)]
#[case(Method::L2)]
#[case(Method::Cosine)]
#[case(Method::Js)]
fn similarity_stays_in_unit_interval(#[case] method: Method) {
    let pairs: [(&[f64], &[f64]); 4] = [
        (&[0.9, 0.1], &[0.1, 0.9]),
        (&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]),
        (&[0.01, 0.0, 0.99], &[0.5, 0.5, 0.0]),
        (&[5.0, 5.0, 5.0], &[1.0, 1.0, 1.0]),
    ];
    for (e, a) in pairs {
        let sim = compare_demographics(e, a, method);
        assert!((0.0..=1.0).contains(&sim), "{method}: {sim}");
    }
}

#[test]
fn scaling_does_not_change_similarity() {
    // Raw counts and proportions compare the same after normalization.
    let e = [6.0, 3.0, 1.0];
    let scaled: Vec<f64> = e.iter().map(|v| v * 123.4).collect();
    for method in [Method::L1, Method::L2, Method::Cosine, Method::Js] {
        let sim = compare_demographics(&e, &scaled, method);
        assert!((sim - 1.0).abs() < 1e-9, "{method}: {sim}");
    }
}

#[test]
fn normalize_l1_sums_to_one() {
    let mut v = [2.0, 3.0, 5.0];
    normalize(&mut v, 1.0);
    assert!((v.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    assert!((v[2] - 0.5).abs() < 1e-12);
}

#[test]
fn normalize_l2_has_unit_norm() {
    let mut v = [3.0, 4.0];
    normalize(&mut v, 2.0);
    let norm = (v[0] * v[0] + v[1] * v[1]).sqrt();
    assert!((norm - 1.0).abs() < 1e-12);
}

#[test]
fn normalize_zero_vector_is_noop() {
    let mut v = [0.0, 0.0, 0.0];
    normalize(&mut v, 1.0);
    assert_eq!(v, [0.0, 0.0, 0.0]);
}
