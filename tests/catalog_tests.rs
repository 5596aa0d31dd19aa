use gptl10n::catalog::{Catalog, TRANSLATED_STATE};
use gptl10n::prompt::BatchEntry;
use tokio_test::assert_ok;

const CATALOG: &str = r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "Cancel" : {
      "comment" : "Button in the pin alert",
      "localizations" : {
        "de" : {
          "stringUnit" : {
            "state" : "translated",
            "value" : "Abbrechen"
          }
        }
      }
    },
    "Hello" : {
      "comment" : "Greeting on the start screen"
    },
    "Internal" : {
      "shouldTranslate" : false
    },
    "Settings" : {
      "extractionState" : "manual",
      "localizations" : {
        "fr" : {
          "stringUnit" : {
            "state" : "translated",
            "value" : "Réglages"
          }
        }
      }
    }
  },
  "version" : "1.0"
}"#;

#[test]
fn test_pending_skips_translated_and_excluded_entries()
{   let catalog = assert_ok!(Catalog::from_json(CATALOG));
    assert_eq!(catalog.source_language, "en");

    let pending = catalog.pending("de");
    assert_eq!(
      pending
    , vec![
        BatchEntry::new("Hello", Some("Greeting on the start screen".to_string()))
      , BatchEntry::new("Settings", None)
      ]
    );

    let keys: Vec<String> = catalog.pending("fr").into_iter().map(|e| e.key).collect();
    assert_eq!(keys, vec!["Cancel", "Hello"]);
}

#[test]
fn test_set_translation_creates_localizations()
{   let mut catalog = assert_ok!(Catalog::from_json(CATALOG));
    assert_ok!(catalog.apply_translation("Hello", "de", "Hallo".to_string()));
    assert_ok!(catalog.apply_translation("Settings", "de", "Einstellungen".to_string()));

    let hello = &catalog.strings["Hello"];
    assert!(hello.is_translated_in("de"));
    let unit = hello.translation("de").unwrap();
    assert_eq!(unit.state, TRANSLATED_STATE);
    assert_eq!(unit.value, "Hallo");

    // existing languages stay
    let settings = &catalog.strings["Settings"];
    assert_eq!(settings.translation("fr").unwrap().value, "Réglages");
    assert_eq!(settings.translation("de").unwrap().value, "Einstellungen");
    assert!(catalog.pending("de").is_empty());
}

#[test]
fn test_unknown_key_is_rejected()
{   let mut catalog = assert_ok!(Catalog::from_json(CATALOG));
    assert!(catalog.apply_translation("Missing", "de", "x".to_string()).is_err());
}

#[test]
fn test_serializes_in_xcode_layout()
{   let catalog = assert_ok!(Catalog::from_json(CATALOG));
    let json = assert_ok!(catalog.to_json());
    assert_eq!(json, CATALOG);
}

#[test]
fn test_unknown_fields_survive_a_save()
{   let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("Localizable.xcstrings");

    let mut catalog = assert_ok!(Catalog::from_json(CATALOG));
    assert_ok!(catalog.apply_translation("Hello", "de", "Hallo".to_string()));
    assert_ok!(catalog.save(&path));

    let reloaded = assert_ok!(Catalog::load(&path));
    assert_eq!(reloaded, catalog);
    assert_eq!(reloaded.extra["version"], "1.0");
    assert_eq!(reloaded.strings["Settings"].extra["extractionState"], "manual");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"value\" : \"Hallo\""));
}

#[test]
fn test_invalid_json_is_a_catalog_error()
{   let err = Catalog::from_json("{ \"strings\": {} }").unwrap_err();
    assert!(matches!(err, gptl10n::Error::Catalog(_)));
}
