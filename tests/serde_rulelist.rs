#![cfg(feature = "serde")]

use rule_list::{Config, RuleList};
use test_log::test;

#[test]
fn rule_list_round_trips_through_json() -> rule_list::Result<()> {
    let x = vec![vec![1, 0, 1], vec![0, 1, 1], vec![1, 1, 1]];
    let y = [1, 0, 1];

    let mut learner = Config::new().learner();
    learner.fit(&x, &y, &["stripes", "spots", "tail"])?;

    let list = learner.rule_list()?;

    let json = serde_json::to_string(list).expect("serialization should succeed");
    let restored: RuleList = serde_json::from_str(&json).expect("deserialization should succeed");

    assert_eq!(list, &restored);
    assert_eq!(list.to_string(), restored.to_string());
    assert_eq!(learner.predict(&x)?, restored.predict(&x)?);

    Ok(())
}
