use space_invaders::config::{GameConfig, Level};
use space_invaders::error::ConfigError;

#[test]
fn empty_file_gives_reference_defaults() {
    let config = GameConfig::from_toml_str("").unwrap();
    assert_eq!(config, GameConfig::default());
    assert_eq!(config.martians.total(), 55);
    assert!(!config.god_mode);
}

#[test]
fn partial_file_overrides_only_named_fields() {
    let config = GameConfig::from_toml_str(
        r#"
god_mode = true

[ship]
lives = 5
"#,
    )
    .unwrap();

    assert!(config.god_mode);
    assert_eq!(config.ship.lives, 5);
    assert_eq!(config.ship.speed, 6.0);
    assert_eq!(config.martians, GameConfig::default().martians);
}

#[test]
fn zero_capacity_is_rejected() {
    let err = GameConfig::from_toml_str("[ship]\nbullet_capacity = 0\n").unwrap_err();
    match err {
        ConfigError::Invalid { field, .. } => assert_eq!(field, "ship.bullet_capacity"),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn zero_effect_lifetime_is_rejected() {
    let err = GameConfig::from_toml_str("[effects]\nlifetime = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "effects.lifetime", .. }));
}

#[test]
fn oversized_grid_is_rejected() {
    let err =
        GameConfig::from_toml_str("[martians]\ncolumns = 70000\nrows = 70000\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "martians", .. }));
}

#[test]
fn oversized_pool_is_rejected() {
    let err =
        GameConfig::from_toml_str("[effects]\ncapacity = 18446744073709551615\n").unwrap_err();
    match err {
        // toml integers are i64, so the largest usize may not even parse.
        ConfigError::Invalid { field, .. } => assert_eq!(field, "effects.capacity"),
        ConfigError::Parse(_) => {}
        other => panic!("expected Invalid or Parse, got {other:?}"),
    }

    let err = GameConfig::from_toml_str("[ship]\nbullet_capacity = 9000000000\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "ship.bullet_capacity", .. }));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let err = GameConfig::from_toml_str("ship = 3\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GameConfig::load_from_file("/nonexistent/space_invaders.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn serialized_default_loads_back() {
    let config = GameConfig::default();
    let text = config.to_toml_string().unwrap();
    assert_eq!(GameConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn hard_level_speeds_up_martians() {
    let config = GameConfig::for_level(Level::Hard);
    assert_eq!(config.martians.move_timer, 12);
    assert_eq!(config.martians.shoot_freq, 40);
    assert_eq!(config.martians.bullet_speed, 7.0);
    // Layout is untouched.
    assert_eq!(config.display, GameConfig::default().display);
}

#[test]
fn medium_level_matches_defaults() {
    assert_eq!(GameConfig::for_level(Level::Medium), GameConfig::default());
    assert_eq!(Level::default(), Level::Medium);
}

#[test]
fn level_parses_names_and_numbers() {
    assert_eq!("easy".parse::<Level>(), Ok(Level::Easy));
    assert_eq!("HARD".parse::<Level>(), Ok(Level::Hard));
    assert_eq!("2".parse::<Level>(), Ok(Level::Medium));
    assert!("nightmare".parse::<Level>().is_err());
}

#[test]
fn level_reads_from_toml_in_lowercase() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        level: Level,
    }
    let w: Wrapper = toml::from_str("level = \"hard\"").unwrap();
    assert_eq!(w.level, Level::Hard);
}
