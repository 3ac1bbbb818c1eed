use rule_list::{Config, Policy};
use test_log::test;

fn toy() -> (Vec<Vec<u8>>, Vec<u8>) {
    (
        vec![vec![1, 0, 1], vec![0, 1, 1], vec![1, 1, 1]],
        vec![1, 0, 1],
    )
}

#[test]
fn toy_dataset_perfect_fit() -> rule_list::Result<()> {
    let (x, y) = toy();

    let mut learner = Config::new().learner();
    learner.fit(&x, &y, &[])?;

    assert_eq!(vec![true, false, true], learner.predict(&x)?);

    let score = learner.score(&x, &y)?;
    assert!((score - 1.0).abs() < f64::EPSILON);

    Ok(())
}

#[test]
fn toy_dataset_learns_one_rule() -> rule_list::Result<()> {
    let (x, y) = toy();

    let mut learner = Config::new().learner();
    learner.fit(&x, &y, &["stripes", "spots", "tail"])?;

    let list = learner.rule_list()?;

    assert_eq!(1, list.len());
    assert_eq!(
        "if [stripes]: prediction = True\nelse prediction = False",
        list.to_string(),
    );

    Ok(())
}

#[test]
fn prediction_name_is_rendered() -> rule_list::Result<()> {
    let (x, y) = toy();

    let mut learner = Config::new().prediction_name("is_zebra").learner();
    learner.fit(&x, &y, &[])?;

    assert!(learner.rule_list()?.to_string().contains("is_zebra = "));

    Ok(())
}

#[test]
fn cooperative_stepping_matches_fit() -> rule_list::Result<()> {
    let (x, y) = toy();

    let mut fitted = Config::new().learner();
    fitted.fit(&x, &y, &[])?;

    let mut stepped = Config::new().learner();
    stepped.begin(&x, &y, &[])?;
    while stepped.step(1)? {
        stepped.verify_search_state();
    }
    stepped.finish(false)?;

    assert_eq!(fitted.rule_list()?, stepped.rule_list()?);

    Ok(())
}

#[test]
fn early_finish_returns_current_incumbent() -> rule_list::Result<()> {
    let (x, y) = toy();

    let mut learner = Config::new().policy(Policy::Bfs).learner();
    learner.begin(&x, &y, &[])?;

    // Stop after a single expansion; the incumbent so far must still
    // be a usable rule list
    let _ = learner.step(1)?;
    let list = learner.finish(true)?;

    assert_eq!(y.len(), list.predict(&x)?.len());

    Ok(())
}
