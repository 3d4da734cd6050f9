use matchable::matchable;

#[matchable(serde)]
pub enum Unit {
    Seconds,
    Minutes,
    #[matchable(rename = "hours (h)")]
    Hours,
}

#[matchable]
pub enum Plain {
    Left,
    Right,
}

#[matchable(serde)]
pub enum Merged {
    Unit(Unit),
    Other,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
pub struct Reading {
    unit: Unit,
    #[serde(with = "matchable::serde")]
    side: Plain,
    #[serde(with = "matchable::serde::option")]
    fallback: Option<Plain>,
    history: Vec<Merged>,
}

#[test]
fn serde_roundtrip() -> anyhow::Result<()> {
    let value = Reading {
        unit: Unit::Hours,
        side: Plain::Right,
        fallback: None,
        history: vec![Unit::Seconds.into(), Merged::Other],
    };

    let serialized = serde_json::to_string(&value)?;
    assert_eq!(
        serialized,
        r#"{"unit":"hours (h)","side":"Right","fallback":null,"history":["Seconds","Other"]}"#
    );
    let deserialized: Reading = serde_json::from_str(&serialized)?;
    assert_eq!(deserialized, value);
    Ok(())
}

#[test]
fn optional_present() -> anyhow::Result<()> {
    let reading: Reading = serde_json::from_str(
        r#"{"unit":"Minutes","side":"Left","fallback":"Right","history":[]}"#,
    )?;
    assert_eq!(reading.fallback, Some(Plain::Right));
    Ok(())
}

#[test]
fn unknown_variant_is_an_error() {
    let error = serde_json::from_str::<Unit>(r#""Days""#).unwrap_err();
    assert!(error.to_string().contains("a variant of Unit"), "{error}");
    assert!(serde_json::from_str::<Unit>("3").is_err());
}
