use strata_core::settings::SettingsStore;
use strata_core::types::SettingsTier;

fn layered_store() -> SettingsStore {
    let mut store = SettingsStore::new();
    store.set_site_settings_string(r#"{"A": {"x": 1}}"#).unwrap();
    store
        .set_user_settings_string(r#"{"A": {"x": 2, "y": [7, 8]}}"#)
        .unwrap();
    store
}

#[test]
fn user_tier_wins_over_site_tier() {
    let store = layered_store();

    assert_eq!(store.get_scalar_setting_as_int("A.x", 0), 2);
    assert_eq!(store.get_vector_setting_as_ints("A.y"), vec![7, 8]);
    assert_eq!(store.get_scalar_setting_as_int("A.z", 99), 99);
    assert!(store.has_setting("A.x"));
    assert!(!store.has_setting("B.x"));
}

#[test]
fn site_tier_answers_when_user_tier_lacks_path() {
    let mut store = SettingsStore::new();
    store
        .set_site_settings_string(r#"{"View": {"Background": [0.1, 0.2, 0.3]}}"#)
        .unwrap();
    store.set_user_settings_string(r#"{"View": {}}"#).unwrap();

    let (tier, _) = store.resolve("View/Background").unwrap();
    assert_eq!(tier, SettingsTier::Site);
    assert_eq!(
        store.get_vector_setting_as_doubles("View.Background"),
        vec![0.1, 0.2, 0.3]
    );
}

#[test]
fn missing_paths_return_defaults() {
    let store = layered_store();

    for default in [-1, 0, 42] {
        assert_eq!(store.get_scalar_setting_as_int("Nope.x", default), default);
    }
    assert_eq!(store.get_scalar_setting_as_double("Nope", 1.5), 1.5);
    assert_eq!(store.get_scalar_setting_as_string("Nope", "fallback"), "fallback");
    assert_eq!(store.get_number_of_elements("Nope"), 0);
    assert!(store.get_vector_setting_as_strings("Nope").is_empty());
    assert_eq!(store.get_vector_setting_as_int("Nope", 0, 5), 5);
}

#[test]
fn empty_store_resolves_nothing() {
    let store = SettingsStore::new();

    assert!(!store.has_setting("A"));
    assert_eq!(store.get_scalar_setting_as_int("A", 3), 3);
    assert!(store.user_settings_string().is_none());
    assert!(store.site_settings_string().is_none());
}

#[test]
fn uncoercible_user_value_does_not_fall_through() {
    let mut store = SettingsStore::new();
    store.set_site_settings_string(r#"{"A": {"x": 1}}"#).unwrap();
    store
        .set_user_settings_string(r#"{"A": {"x": "not a number"}}"#)
        .unwrap();

    assert_eq!(store.get_scalar_setting_as_int("A.x", -7), -7);
    assert_eq!(store.get_scalar_setting_as_string("A.x", ""), "not a number");
}

#[test]
fn scalar_coercions_between_types() {
    let mut store = SettingsStore::new();
    store
        .set_user_settings_string(r#"{"n": 3, "d": 2.75, "s": "12", "b": true}"#)
        .unwrap();

    assert_eq!(store.get_scalar_setting_as_string("n", ""), "3");
    assert_eq!(store.get_scalar_setting_as_int("d", 0), 2);
    assert_eq!(store.get_scalar_setting_as_double("s", 0.0), 12.0);
    assert_eq!(store.get_scalar_setting_as_int("b", 0), 1);
}

#[test]
fn scalar_and_array_nodes_as_vectors() {
    let mut store = SettingsStore::new();
    store
        .set_user_settings_string(r#"{"one": 5, "many": ["a", "b", "c"], "obj": {"k": 1}}"#)
        .unwrap();

    assert_eq!(store.get_number_of_elements("one"), 1);
    assert_eq!(store.get_vector_setting_as_ints("one"), vec![5]);
    assert_eq!(store.get_number_of_elements("many"), 3);
    assert_eq!(store.get_vector_setting_as_string("many", 2, "z"), "c");
    assert_eq!(store.get_vector_setting_as_string("many", 3, "z"), "z");
    assert_eq!(store.get_number_of_elements("obj"), 0);
    assert!(store.get_vector_setting_as_ints("obj").is_empty());
}

#[test]
fn vector_with_bad_element_is_empty() {
    let mut store = SettingsStore::new();
    store
        .set_user_settings_string(r#"{"v": [1, "two", 3]}"#)
        .unwrap();

    assert!(store.get_vector_setting_as_ints("v").is_empty());
    assert_eq!(store.get_vector_setting_as_int("v", 2, 0), 3);
    assert_eq!(store.get_vector_setting_as_int("v", 1, -1), -1);
    assert_eq!(
        store.get_vector_setting_as_strings("v"),
        vec!["1".to_string(), "two".to_string(), "3".to_string()]
    );
}

#[test]
fn set_scalar_round_trips() {
    let mut store = SettingsStore::new();

    for value in [-3_i64, 0, 17] {
        store.set_scalar_setting("Filters.Clip.Count", value);
        assert_eq!(store.get_scalar_setting_as_int("Filters.Clip.Count", 99), value);
    }

    store.set_scalar_setting("Filters.Clip.Label", "clip");
    assert_eq!(store.get_scalar_setting_as_string("Filters.Clip.Label", ""), "clip");

    store.set_scalar_setting("Filters.Clip.Opacity", 0.25);
    assert_eq!(store.get_scalar_setting_as_double("Filters.Clip.Opacity", 1.0), 0.25);
}

#[test]
fn non_finite_doubles_round_trip() {
    let mut store = SettingsStore::new();

    store.set_scalar_setting("Range.Max", f64::INFINITY);
    store.set_scalar_setting("Range.Min", f64::NEG_INFINITY);
    store.set_scalar_setting("Range.Step", f64::NAN);

    assert!(store.has_setting("Range.Max"));
    assert_eq!(store.get_scalar_setting_as_double("Range.Max", 0.0), f64::INFINITY);
    assert_eq!(store.get_scalar_setting_as_double("Range.Min", 0.0), f64::NEG_INFINITY);
    assert!(store.get_scalar_setting_as_double("Range.Step", 0.0).is_nan());

    store.set_vector_setting("Range.Bounds", [f64::NAN, 1.5, f64::INFINITY]);
    let bounds = store.get_vector_setting_as_doubles("Range.Bounds");
    assert_eq!(bounds.len(), 3);
    assert!(bounds[0].is_nan());
    assert_eq!(bounds[1..], [1.5, f64::INFINITY]);
}

#[test]
fn set_vector_round_trips() {
    let mut store = SettingsStore::new();
    store.set_vector_setting("P", [1, 2, 3]);

    assert_eq!(store.get_number_of_elements("P"), 3);
    assert_eq!(store.get_vector_setting_as_ints("P"), vec![1, 2, 3]);

    store.set_vector_setting("Names", vec!["x".to_string(), "y".to_string()]);
    assert_eq!(store.get_vector_setting_as_strings("Names"), vec!["x", "y"]);
}

#[test]
fn set_scalar_is_readable_as_single_element_vector() {
    let mut store = SettingsStore::new();
    store.set_scalar_setting("P", 5);

    assert_eq!(store.get_number_of_elements("P"), 1);
    assert_eq!(store.get_vector_setting_as_ints("P"), vec![5]);
}

#[test]
fn writes_target_user_layer_and_shadow_site() {
    let mut store = SettingsStore::new();
    store.set_site_settings_string(r#"{"A": {"x": 1}}"#).unwrap();

    store.set_scalar_setting("A.x", 10);

    assert_eq!(store.get_scalar_setting_as_int("A.x", 0), 10);
    let site = store.layer(SettingsTier::Site).unwrap();
    assert_eq!(site.raw(), r#"{"A": {"x": 1}}"#);
    assert!(store.user_settings_string().unwrap().contains("10"));
}

#[test]
fn writes_replace_scalar_parents() {
    let mut store = SettingsStore::new();
    store.set_user_settings_string(r#"{"A": 1}"#).unwrap();

    store.set_scalar_setting("A/b/c", "deep");

    assert_eq!(store.get_scalar_setting_as_string("A.b.c", ""), "deep");
    assert_eq!(store.get_number_of_elements("A"), 0);
}

#[test]
fn reloading_same_text_is_idempotent() {
    let text = r#"{"A": {"x": 2, "y": [7, 8], "s": "v"}}"#;
    let mut store = SettingsStore::new();

    store.set_user_settings_string(text).unwrap();
    let first = (
        store.get_scalar_setting_as_int("A.x", 0),
        store.get_vector_setting_as_ints("A.y"),
        store.get_scalar_setting_as_string("A.s", ""),
    );

    store.set_user_settings_string(text).unwrap();
    let second = (
        store.get_scalar_setting_as_int("A.x", 0),
        store.get_vector_setting_as_ints("A.y"),
        store.get_scalar_setting_as_string("A.s", ""),
    );

    assert_eq!(first, second);
    assert_eq!(store.user_settings_string(), Some(text));
}

#[test]
fn invalid_text_keeps_previous_layer() {
    let mut store = layered_store();

    assert!(store.set_user_settings_string("not valid json").is_err());
    assert!(store.set_user_settings_string("[1, 2, 3]").is_err());

    assert_eq!(store.get_scalar_setting_as_int("A.x", 0), 2);
    assert_eq!(store.get_vector_setting_as_ints("A.y"), vec![7, 8]);
    assert_eq!(
        store.user_settings_string(),
        Some(r#"{"A": {"x": 2, "y": [7, 8]}}"#)
    );
}

#[test]
fn invalid_text_leaves_absent_tier_absent() {
    let mut store = SettingsStore::new();

    assert!(store.set_site_settings_string("{").is_err());

    assert!(store.layer(SettingsTier::Site).is_none());
    assert!(store.layers().is_empty());
}

#[test]
fn layers_are_kept_in_precedence_order() {
    let mut store = SettingsStore::new();
    store.set_site_settings_string("{}").unwrap();
    store.set_scalar_setting("x", 1);

    let tiers: Vec<_> = store.layers().iter().map(|layer| layer.tier()).collect();
    assert_eq!(tiers, vec![SettingsTier::User, SettingsTier::Site]);
}
