use serde_json::json;

use beseech_spec::{
    Assembler, History, LeafSpec, Predicate, Registry, Source, check, normalize, resolve,
};

#[test]
fn rules_apply_in_order_default_then_required_then_pattern() {
    let leaf = LeafSpec::new()
        .required(true)
        .default_value("anonymous")
        .pattern("^[a-z]+$")
        .warning("lowercase letters only")
        .into_leaf(vec!["user".into()]);

    // Empty input takes the default, which then satisfies both rules.
    let value = resolve(&leaf, "");
    assert_eq!(value, "anonymous");
    assert!(check(&leaf, &value, &History::default()).unwrap().valid);

    // A typed value still has to pass the pattern.
    let value = resolve(&leaf, "Not Lower");
    let outcome = check(&leaf, &value, &History::default()).unwrap();
    assert!(!outcome.valid);
    assert_eq!(outcome.message.as_deref(), Some("lowercase letters only"));
}

#[test]
fn predicate_consults_prior_answers() {
    let sound = LeafSpec::new()
        .predicate(Predicate::new(|value, history| {
            match history.lookup("animal").map(|entry| entry.value.as_str()) {
                Some("dog") => value == "woof",
                Some("cat") => value == "meow",
                _ => true,
            }
        }))
        .warning("that animal makes a different sound")
        .into_leaf(vec!["sound".into()]);

    let mut history = History::default();
    history.remember("animal", "dog");

    assert!(check(&sound, "woof", &history).unwrap().valid);
    let outcome = check(&sound, "meow", &history).unwrap();
    assert!(!outcome.valid);
    assert_eq!(
        outcome.message.as_deref(),
        Some("that animal makes a different sound")
    );
}

#[test]
fn normalized_schema_round_trips_through_the_assembler() {
    let schema = json!({
        "properties": {
            "url": {},
            "auth": {
                "properties": {
                    "username": {},
                    "password": { "hidden": true }
                }
            }
        }
    });
    let leaves = normalize(&Source::from(schema), &Registry::new());

    let mut assembler = Assembler::new();
    let answers = ["example.org", "amy", "hunter2"];
    for (leaf, answer) in leaves.iter().zip(answers) {
        assembler.accept(&leaf.path, json!(answer));
    }

    assert_eq!(
        assembler.into_value(),
        json!({
            "url": "example.org",
            "auth": { "username": "amy", "password": "hunter2" }
        })
    );
}
