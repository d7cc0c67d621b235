use alias_loader::ErrorCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;

fn config(extra: Value) -> Config {
	Config::from_extra("vendor/package", &extra)
}

/// Verifies that an empty lookup key is rejected with its stable code.
#[test]
fn empty_key_is_rejected_with_stable_code() {
	let err = Config::new("vendor/package").get("").unwrap_err();
	assert!(matches!(err, ConfigError::EmptyKey));
	assert_eq!(err.code(), Some(ErrorCode::EmptyKey.as_u32()));
	assert_eq!(err.code(), Some(1444039407));
}

/// Verifies that defaults apply when a package configures nothing.
#[test]
fn defaults_apply_when_nothing_is_configured() {
	let config = config(json!({}));

	assert_eq!(config.get(OPTION_ALWAYS_ADD_ALIAS_LOADER).unwrap(), Some(&Value::Bool(false)));
	assert_eq!(config.get(OPTION_AUTOLOAD_CASE_SENSITIVITY).unwrap(), Some(&Value::Bool(true)));
	assert_eq!(config.get(OPTION_CLASS_ALIAS_MAPS).unwrap(), Some(&Value::Null));
	assert_eq!(config.get(OPTION_AUTOLOAD_MODE).unwrap(), Some(&json!("normal")));
	assert_eq!(config.autoload_mode(), AutoloadMode::Normal);
	assert_eq!(config.class_alias_maps(), None);
	assert!(config.warnings().is_empty());
	assert_eq!(config, Config::new("vendor/package"));
}

#[test]
fn alias_maps_are_extracted() {
	let config = config(json!({ SECTION: { "class-alias-maps": ["path/map.json"] } }));

	assert_eq!(config.class_alias_maps(), Some(vec!["path/map.json"]));
	assert_eq!(config.get("class-alias-maps").unwrap(), Some(&json!(["path/map.json"])));
	assert!(config.warnings().is_empty());
}

/// Verifies that the deprecated section is read and reported.
#[test]
fn alias_maps_are_extracted_from_deprecated_section() {
	let config = config(json!({ DEPRECATED_SECTION: { "class-alias-maps": ["path/map.json"] } }));

	assert_eq!(config.class_alias_maps(), Some(vec!["path/map.json"]));
	assert_eq!(
		config.warnings(),
		&[ConfigWarning::DeprecatedSection {
			package: "vendor/package".into()
		}]
	);
}

/// Verifies that both flags are read from either section name.
#[rstest]
#[case::current(SECTION)]
#[case::deprecated(DEPRECATED_SECTION)]
fn flags_are_extracted(#[case] section: &str) {
	let config = config(json!({ section: { "always-add-alias-loader": true, "autoload-case-sensitivity": false } }));

	assert!(config.always_add_alias_loader());
	assert!(!config.is_case_sensitive());
}

/// Verifies that top-level keys are read, with one warning each, when no
/// section exists.
#[test]
fn top_level_keys_are_a_deprecated_fallback() {
	let config = config(json!({ "class-alias-maps": ["map.json"], "autoload-case-sensitivity": false }));

	assert_eq!(config.class_alias_maps(), Some(vec!["map.json"]));
	assert!(!config.is_case_sensitive());
	assert_eq!(
		config.warnings(),
		&[
			ConfigWarning::DeprecatedTopLevelKey {
				package: "vendor/package".into(),
				key: OPTION_CLASS_ALIAS_MAPS,
			},
			ConfigWarning::DeprecatedTopLevelKey {
				package: "vendor/package".into(),
				key: OPTION_AUTOLOAD_CASE_SENSITIVITY,
			},
		]
	);
}

/// Verifies that the current section shadows every deprecated location.
#[test]
fn current_section_shadows_every_fallback() {
	let config = config(json!({
		SECTION: { "always-add-alias-loader": true },
		DEPRECATED_SECTION: { "class-alias-maps": ["old.json"] },
		"autoload-case-sensitivity": false,
	}));

	assert!(config.always_add_alias_loader());
	assert!(config.is_case_sensitive());
	assert_eq!(config.class_alias_maps(), None);
	assert!(config.warnings().is_empty());
}

#[test]
fn top_level_always_add_is_not_a_fallback() {
	let config = config(json!({ "always-add-alias-loader": true }));
	assert!(!config.always_add_alias_loader());
}

/// Verifies that flags are cast with loose truthiness.
#[rstest]
#[case::zero(json!(0), false)]
#[case::one(json!(1), true)]
#[case::empty_string(json!(""), false)]
#[case::zero_string(json!("0"), false)]
#[case::false_string(json!("false"), true)]
#[case::empty_array(json!([]), false)]
#[case::array(json!([0]), true)]
#[case::empty_object(json!({}), false)]
fn flags_follow_loose_truthiness(#[case] value: Value, #[case] expected: bool) {
	let config = config(json!({ SECTION: { "always-add-alias-loader": value } }));
	assert_eq!(config.always_add_alias_loader(), expected);
}

#[test]
fn null_counts_as_unset() {
	let config = config(json!({ SECTION: { "autoload-case-sensitivity": null } }));
	assert!(config.is_case_sensitive());
}

/// Verifies that any map option value is cast to a list.
#[rstest]
#[case::string(json!("map.json"), json!(["map.json"]))]
#[case::object(json!({ "first": "a.json", "second": "b.json" }), json!(["a.json", "b.json"]))]
#[case::array(json!(["a.json", "b.json"]), json!(["a.json", "b.json"]))]
fn alias_maps_are_cast_to_a_list(#[case] value: Value, #[case] expected: Value) {
	let config = config(json!({ SECTION: { "class-alias-maps": value } }));
	assert_eq!(config.get(OPTION_CLASS_ALIAS_MAPS).unwrap(), Some(&expected));
}

/// Verifies that dotted paths index into nested values and lists.
#[test]
fn dotted_paths_reach_into_lists() {
	let config = config(json!({ SECTION: { "class-alias-maps": ["a.json", "b.json"] } }));

	assert_eq!(config.get("class-alias-maps.1").unwrap(), Some(&json!("b.json")));
	assert_eq!(config.get("class-alias-maps.2").unwrap(), None);
	assert_eq!(config.get("class-alias-maps.x").unwrap(), None);
	assert_eq!(config.get("always-add-alias-loader.deep").unwrap(), None);
	assert_eq!(config.get("unknown").unwrap(), None);
}

#[test]
fn warnings_render_package_and_key() {
	let warning = ConfigWarning::DeprecatedTopLevelKey {
		package: "vendor/package".into(),
		key: OPTION_CLASS_ALIAS_MAPS,
	};
	let text = warning.to_string();
	assert!(text.contains("vendor/package"));
	assert!(text.contains("class-alias-maps"));
	assert!(text.contains(SECTION));
}

/// Verifies that the autoload mode is read from the section and cast to text.
#[rstest]
#[case::force(json!("force-alias-loading"), AutoloadMode::ForceAliasLoading)]
#[case::normal(json!("normal"), AutoloadMode::Normal)]
#[case::unknown(json!("eager"), AutoloadMode::Normal)]
#[case::boolean(json!(true), AutoloadMode::Normal)]
fn autoload_mode_is_extracted(#[case] value: Value, #[case] expected: AutoloadMode) {
	let config = config(json!({ SECTION: { "autoload-mode": value } }));
	assert_eq!(config.autoload_mode(), expected);
}

#[test]
fn autoload_mode_is_not_a_top_level_fallback() {
	let config = config(json!({ "autoload-mode": "force-alias-loading" }));
	assert_eq!(config.autoload_mode(), AutoloadMode::Normal);
	assert_eq!(config.get("autoload-mode").unwrap(), Some(&json!("normal")));
}

#[test]
fn scalar_mode_values_are_cast_to_strings() {
	let config = config(json!({ SECTION: { "autoload-mode": true } }));
	assert_eq!(config.get(OPTION_AUTOLOAD_MODE).unwrap(), Some(&json!("1")));
}
