//! End-to-end resolution tests: the flag/env precedence matrix across the
//! supported value kinds, plus coercion failure and declaration errors.

use chrono::TimeDelta;
use flagenv::{FlagenvError, MockEnv, PrecedenceMode, Registry, ValueKind};

const NO_ARGS: [&str; 0] = [];

#[test]
fn test_default_stands_when_neither_source_is_present() {
    let mut registry = Registry::new();
    let host = registry
        .bind("host", "APP_HOST", "localhost".to_string(), "server host")
        .unwrap();
    let timeout = registry
        .bind("timeout", "APP_TIMEOUT", TimeDelta::minutes(1), "request timeout")
        .unwrap();

    registry.resolve_from(NO_ARGS, &MockEnv::new()).unwrap();

    assert_eq!(host.get(), "localhost");
    assert_eq!(timeout.get(), TimeDelta::minutes(1));
}

#[test]
fn test_env_only_wins_regardless_of_mode() {
    for mode in [PrecedenceMode::EnvWins, PrecedenceMode::FlagWins] {
        let mut registry = Registry::new();
        registry.set_mode(mode);
        let value = registry
            .bind("value", "TEST_VALUE", "foobar".to_string(), "test value")
            .unwrap();

        let env = MockEnv::from_pairs([("TEST_VALUE", "peace_and_love")]);
        registry.resolve_from(NO_ARGS, &env).unwrap();

        assert_eq!(value.get(), "peace_and_love", "mode {mode:?}");
    }
}

#[test]
fn test_flag_only_wins_regardless_of_mode() {
    for mode in [PrecedenceMode::EnvWins, PrecedenceMode::FlagWins] {
        let mut registry = Registry::new();
        registry.set_mode(mode);
        let count = registry.bind("count", "TEST_COUNT", 111i32, "test count").unwrap();

        registry
            .resolve_from(["--count", "42"], &MockEnv::new())
            .unwrap();

        assert_eq!(count.get(), 42, "mode {mode:?}");
    }
}

#[test]
fn test_env_wins_on_conflict_by_default() {
    let mut registry = Registry::new();
    let count = registry.bind("count", "TEST_COUNT", 111i32, "test count").unwrap();

    let env = MockEnv::from_pairs([("TEST_COUNT", "222")]);
    registry.resolve_from(["--count", "333"], &env).unwrap();

    assert_eq!(count.get(), 222);
}

#[test]
fn test_flag_wins_on_conflict_when_mode_flipped() {
    let mut registry = Registry::new();
    registry.set_mode(PrecedenceMode::FlagWins);
    let ratio = registry.bind("ratio", "TEST_RATIO", 3.2f64, "test ratio").unwrap();

    let env = MockEnv::from_pairs([("TEST_RATIO", "3.4")]);
    registry.resolve_from(["--ratio", "3.3"], &env).unwrap();

    assert_eq!(ratio.get(), 3.3);
}

#[test]
fn test_flag_value_equal_to_default_still_counts_as_present() {
    // The collaborator reports explicit passing, so a flag set to its
    // default value is still detected under FlagWins.
    let mut registry = Registry::new();
    registry.set_mode(PrecedenceMode::FlagWins);
    let count = registry.bind("count", "TEST_COUNT", 111i32, "test count").unwrap();

    let env = MockEnv::from_pairs([("TEST_COUNT", "222")]);
    registry.resolve_from(["--count", "111"], &env).unwrap();

    assert_eq!(count.get(), 111);
}

#[test]
fn test_every_kind_resolves_from_env() {
    let mut registry = Registry::new();
    let s = registry.bind("s", "E_S", String::new(), "").unwrap();
    let i32v = registry.bind("i32", "E_I32", 0i32, "").unwrap();
    let i64v = registry.bind("i64", "E_I64", 0i64, "").unwrap();
    let u32v = registry.bind("u32", "E_U32", 0u32, "").unwrap();
    let u64v = registry.bind("u64", "E_U64", 0u64, "").unwrap();
    let f64v = registry.bind("f64", "E_F64", 0.0f64, "").unwrap();
    let b = registry.bind("b", "E_B", false, "").unwrap();
    let d = registry.bind("d", "E_D", TimeDelta::zero(), "").unwrap();

    let env = MockEnv::from_pairs([
        ("E_S", "hello"),
        ("E_I32", "-5"),
        ("E_I64", "9000000000"),
        ("E_U32", "7"),
        ("E_U64", "18446744073709551615"),
        ("E_F64", "2.5"),
        ("E_B", "1"),
        ("E_D", "90s"),
    ]);
    registry.resolve_from(NO_ARGS, &env).unwrap();

    assert_eq!(s.get(), "hello");
    assert_eq!(i32v.get(), -5);
    assert_eq!(i64v.get(), 9_000_000_000);
    assert_eq!(u32v.get(), 7);
    assert_eq!(u64v.get(), u64::MAX);
    assert_eq!(f64v.get(), 2.5);
    assert!(b.get());
    assert_eq!(d.get(), TimeDelta::seconds(90));
}

#[test]
fn test_duration_env_string_resolves_to_nanoseconds() {
    let mut registry = Registry::new();
    let timeout = registry
        .bind("timeout", "TEST_TIMEOUT", TimeDelta::zero(), "timeout")
        .unwrap();

    let env = MockEnv::from_pairs([("TEST_TIMEOUT", "3h")]);
    registry.resolve_from(NO_ARGS, &env).unwrap();

    assert_eq!(
        timeout.get().num_nanoseconds(),
        Some(3 * 3600 * 1_000_000_000)
    );
}

#[test]
fn test_invalid_duration_env_string_is_coercion_error() {
    let mut registry = Registry::new();
    registry
        .bind("timeout", "TEST_TIMEOUT", TimeDelta::zero(), "timeout")
        .unwrap();

    let env = MockEnv::from_pairs([("TEST_TIMEOUT", "notaduration")]);
    let err = registry.resolve_from(NO_ARGS, &env).unwrap_err();

    match err {
        FlagenvError::CoercionError { name, raw, kind, .. } => {
            assert_eq!(name, "timeout");
            assert_eq!(raw, "notaduration");
            assert_eq!(kind, ValueKind::Duration);
        }
        other => panic!("expected coercion error, got {other}"),
    }
}

#[test]
fn test_bool_env_is_case_insensitive_and_strict() {
    let mut registry = Registry::new();
    let flag = registry.bind("flag", "TEST_FLAG", false, "test flag").unwrap();

    let env = MockEnv::from_pairs([("TEST_FLAG", "TRUE")]);
    registry.resolve_from(NO_ARGS, &env).unwrap();
    assert!(flag.get());

    let env = MockEnv::from_pairs([("TEST_FLAG", "yes")]);
    let err = registry.resolve_from(NO_ARGS, &env).unwrap_err();
    assert!(matches!(err, FlagenvError::CoercionError { .. }));
}

#[test]
fn test_empty_env_string_counts_as_present() {
    let mut registry = Registry::new();
    let host = registry
        .bind("host", "APP_HOST", "localhost".to_string(), "server host")
        .unwrap();

    let env = MockEnv::from_pairs([("APP_HOST", "")]);
    registry.resolve_from(NO_ARGS, &env).unwrap();

    assert_eq!(host.get(), "");
}

#[test]
fn test_coercion_failure_does_not_roll_back_earlier_bindings() {
    let mut registry = Registry::new();
    let host = registry
        .bind("host", "APP_HOST", "localhost".to_string(), "server host")
        .unwrap();
    registry.bind("port", "APP_PORT", 80u32, "listen port").unwrap();

    let env = MockEnv::from_pairs([("APP_HOST", "example.com"), ("APP_PORT", "not-a-port")]);
    let err = registry.resolve_from(NO_ARGS, &env).unwrap_err();

    assert!(matches!(err, FlagenvError::CoercionError { .. }));
    assert_eq!(host.get(), "example.com");
}

#[test]
fn test_re_resolution_overwrites_previous_value() {
    let mut registry = Registry::new();
    let host = registry
        .bind("host", "APP_HOST", "localhost".to_string(), "server host")
        .unwrap();

    let env = MockEnv::from_pairs([("APP_HOST", "first")]);
    registry.resolve_from(NO_ARGS, &env).unwrap();
    assert_eq!(host.get(), "first");

    let env = MockEnv::from_pairs([("APP_HOST", "second")]);
    registry.resolve_from(NO_ARGS, &env).unwrap();
    assert_eq!(host.get(), "second");

    // With the variable gone, the previously resolved value stands: an
    // absent source never writes.
    registry.resolve_from(NO_ARGS, &MockEnv::new()).unwrap();
    assert_eq!(host.get(), "second");
}

#[test]
fn test_bind_auto_derives_env_name_used_for_resolution() {
    let mut registry = Registry::new();
    registry.set_env_prefix("foo");
    let (project, env_var) = registry
        .bind_auto("project-id", "default".to_string(), "project identifier")
        .unwrap();
    assert_eq!(env_var, "FOO_PROJECT_ID");

    let env = MockEnv::from_pairs([("FOO_PROJECT_ID", "p-123")]);
    registry.resolve_from(NO_ARGS, &env).unwrap();
    assert_eq!(project.get(), "p-123");
}

#[test]
fn test_independent_registries_do_not_cross_contaminate() {
    let mut first = Registry::new();
    let a = first.bind("value", "SHARED_VAR", 1i64, "").unwrap();

    let mut second = Registry::new();
    second.set_mode(PrecedenceMode::FlagWins);
    let b = second.bind("value", "SHARED_VAR", 2i64, "").unwrap();

    let env = MockEnv::from_pairs([("SHARED_VAR", "10")]);
    first.resolve_from(NO_ARGS, &env).unwrap();
    second.resolve_from(["--value", "20"], &env).unwrap();

    assert_eq!(a.get(), 10);
    assert_eq!(b.get(), 20);
}
