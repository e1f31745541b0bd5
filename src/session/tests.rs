use super::*;

const GOOD_PASSWORD: &str = "Secr3t.pass";

fn store() -> (tempfile::TempDir, SessionStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::at(dir.path().join("teaser"));
    (dir, store)
}

#[test]
fn register_signs_in_and_persists_account() {
    let (_dir, store) = store();
    let account = store
        .register("Ana Pérez", "ana.perez@example.com", GOOD_PASSWORD, GOOD_PASSWORD)
        .unwrap();
    assert_eq!(account.email, "ana.perez@example.com");
    assert_eq!(
        store.current_user().unwrap().as_deref(),
        Some("ana.perez@example.com")
    );

    let on_disk = std::fs::read_to_string(store.root().join("account.toml")).unwrap();
    assert!(on_disk.contains("Ana Pérez"));
    assert!(!on_disk.contains(GOOD_PASSWORD));
}

#[test]
fn register_rejects_invalid_input_without_writing() {
    let (_dir, store) = store();
    let err = store
        .register("Al", "al@example.com", GOOD_PASSWORD, GOOD_PASSWORD)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Invalid(ValidationError::NameTooShort)
    ));

    let err = store
        .register("Alice", "alice@example.com", GOOD_PASSWORD, "Secr3t.pasS")
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Invalid(ValidationError::PasswordMismatch)
    ));
    assert!(store.account().unwrap().is_none());
}

#[test]
fn login_checks_credentials() {
    let (_dir, store) = store();
    store
        .register("Alice", "alice@example.com", GOOD_PASSWORD, GOOD_PASSWORD)
        .unwrap();
    store.logout().unwrap();

    assert!(matches!(
        store.login("alice@example.com", "Wrong.pass1"),
        Err(SessionError::InvalidCredentials)
    ));
    assert!(matches!(
        store.login("bob@example.com", GOOD_PASSWORD),
        Err(SessionError::InvalidCredentials)
    ));
    assert!(store.current_user().unwrap().is_none());

    store.login("alice@example.com", GOOD_PASSWORD).unwrap();
    assert_eq!(
        store.current_user().unwrap().as_deref(),
        Some("alice@example.com")
    );
}

#[test]
fn login_without_account_reports_missing_registration() {
    let (_dir, store) = store();
    assert!(matches!(
        store.login("alice@example.com", GOOD_PASSWORD),
        Err(SessionError::NoAccount)
    ));
}

#[test]
fn login_validates_shape_first() {
    let (_dir, store) = store();
    assert!(matches!(
        store.login("not-an-email", GOOD_PASSWORD),
        Err(SessionError::Invalid(ValidationError::EmailInvalid))
    ));
    assert!(matches!(
        store.login("alice@example.com", ""),
        Err(SessionError::Invalid(ValidationError::PasswordMissing))
    ));
}

#[test]
fn logout_is_idempotent_and_keeps_account() {
    let (_dir, store) = store();
    store
        .register("Alice", "alice@example.com", GOOD_PASSWORD, GOOD_PASSWORD)
        .unwrap();
    assert!(store.logout().unwrap());
    assert!(!store.logout().unwrap());
    assert!(store.account().unwrap().is_some());
}

#[test]
fn re_registering_replaces_account_and_old_session() {
    let (_dir, store) = store();
    store
        .register("Alice", "alice@example.com", GOOD_PASSWORD, GOOD_PASSWORD)
        .unwrap();
    store
        .register("Bob Smith", "bob@example.com", GOOD_PASSWORD, GOOD_PASSWORD)
        .unwrap();
    assert_eq!(store.current_user().unwrap().as_deref(), Some("bob@example.com"));
    assert!(matches!(
        store.login("alice@example.com", GOOD_PASSWORD),
        Err(SessionError::InvalidCredentials)
    ));
}

#[test]
fn corrupt_session_file_is_an_error() {
    let (_dir, store) = store();
    std::fs::create_dir_all(store.root()).unwrap();
    std::fs::write(store.root().join("session.toml"), "email = [").unwrap();
    assert!(matches!(
        store.current_user(),
        Err(SessionError::Parse { .. })
    ));
}

#[test]
fn password_rules() {
    assert_eq!(validate_password(""), Err(ValidationError::PasswordMissing));
    assert_eq!(validate_password("Ab1."), Err(ValidationError::PasswordTooShort));
    assert_eq!(
        validate_password("abcdefg1."),
        Err(ValidationError::PasswordNoUppercase)
    );
    assert_eq!(
        validate_password("ABCDEFG1."),
        Err(ValidationError::PasswordNoLowercase)
    );
    assert_eq!(
        validate_password("Abcdefgh."),
        Err(ValidationError::PasswordNoDigit)
    );
    assert_eq!(
        validate_password("Abcdefg12"),
        Err(ValidationError::PasswordNoSpecial)
    );
    assert_eq!(validate_password("Abcdefg1|"), Ok(()));
    assert_eq!(validate_password("Abcdefg1\""), Ok(()));
}

#[test]
fn email_shapes() {
    assert_eq!(validate_email("  "), Err(ValidationError::EmailMissing));
    assert_eq!(validate_email("a@b.co"), Ok(()));
    assert_eq!(validate_email("first.last+tag@mail.example.org"), Ok(()));
    assert_eq!(validate_email("o'brien@sub-domain.example.mx"), Ok(()));
    for bad in [
        "plain",
        "@example.com",
        "a@b",
        "a@@b.com",
        "a b@c.com",
        "a@.com",
        "a@b..com",
        "a@-b.com",
        "a@b.com.",
        "a(b)@c.com",
    ] {
        assert_eq!(validate_email(bad), Err(ValidationError::EmailInvalid), "{bad}");
    }
}

#[test]
fn greeting_alias_from_local_part() {
    assert_eq!(greeting_alias("ana.maria_lopez-x@example.com"), "ana maria lopez x");
    assert_eq!(greeting_alias("bob@example.com"), "bob");
    assert_eq!(greeting_alias("@example.com"), "you");
    assert_eq!(greeting_alias(""), "you");
}

#[test]
fn hash_comparison_requires_every_byte() {
    use super::store::constant_time_eq;

    assert!(constant_time_eq(b"abc", b"abc"));
    assert!(!constant_time_eq(b"abc", b"abd"));
    assert!(!constant_time_eq(b"xbc", b"abc"));
    assert!(!constant_time_eq(b"abc", b"abcd"));
    assert!(constant_time_eq(b"", b""));
}
