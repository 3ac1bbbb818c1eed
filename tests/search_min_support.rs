use rule_list::Config;
use test_log::test;

#[test]
fn min_support_collapses_to_the_default_rule() -> rule_list::Result<()> {
    let x = vec![vec![1, 0, 0], vec![0, 1, 0], vec![0, 0, 1]];
    let y = [1, 0, 0];

    let mut learner = Config::new().learner();
    learner.fit(&x, &y, &[])?;
    let unfiltered = learner.rule_list()?.len();

    let mut learner = Config::new().min_support(0.4).learner();
    learner.fit(&x, &y, &[])?;
    let filtered = learner.rule_list()?.len();

    // With the default support window the positive sample is separable;
    // at 0.4 every candidate antecedent is filtered out
    assert!(unfiltered >= 1);
    assert_eq!(0, filtered);

    Ok(())
}

#[test]
fn min_support_zero_admits_tiny_rules() -> rule_list::Result<()> {
    let x = vec![
        vec![1, 0],
        vec![0, 1],
        vec![0, 0],
        vec![0, 0],
        vec![0, 0],
    ];
    let y = [1, 0, 0, 0, 0];

    let mut learner = Config::new().min_support(0.0).learner();
    learner.fit(&x, &y, &[])?;

    // The 1-of-5 support rule is allowed and gives a perfect fit
    let score = learner.score(&x, &y)?;
    assert!((score - 1.0).abs() < f64::EPSILON);

    Ok(())
}
