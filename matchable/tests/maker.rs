use matchable::{
    Flags,
    maker::{GrowMode, LoadError, MatchableMaker, SaveContent, SaveError, SyntaxErrorKind},
};

fn house() -> MatchableMaker {
    let mut maker = MatchableMaker::default();

    let room = maker.grab("Room");
    for name in ["Bathroom", "Bedroom", "Hallway"] {
        room.add_variant(name);
    }
    room.add_spread("Floor::Type", "floor");
    room.add_spread("Room::Type", "neighbors");
    room.set_spread("Bathroom", "floor", "Floor::Tile").unwrap();
    room.set_spread_vect("Hallway", "neighbors", ["Room::Bathroom", "Room::Bedroom"])
        .unwrap();

    let floor = maker.grab("Floor");
    floor.add_variant("Tile");
    floor.add_variant("Carpet");

    maker
}

fn both() -> Flags<SaveContent> {
    Flags::from_variants([SaveContent::GeneratedMatchable, SaveContent::Matchables])
}

#[test]
fn save_and_load_wrap() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("house.txt");

    let maker = house();
    maker.save_as(&path, &Flags::from_variants([SaveContent::Matchables]), GrowMode::Wrap)?;

    let text = std::fs::read_to_string(&path)?;
    let floor = text.find("MATCHABLE(Floor, Tile, Carpet)").unwrap();
    let room = text
        .find("SPREADx2_MATCHABLE(Floor::Type, floor, Room::Type, neighbors, Room, Bathroom, Bedroom, Hallway)")
        .unwrap();
    assert!(floor < room);
    assert!(text.contains("SET_SPREAD(Room, Bathroom, floor, Floor::Tile)\n"));

    let loaded = MatchableMaker::load(&path)?;
    assert_eq!(loaded, maker);
    Ok(())
}

#[test]
fn save_and_load_always() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("house.txt");

    let maker = house();
    maker.save_as(&path, &both(), GrowMode::Always)?;

    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("MATCHABLE_GROW(generated_matchable, Floor, Room)\n"));
    assert!(text.contains("SPREADx2_MATCHABLE_GROW("));
    assert!(!text.contains("MATCHABLE("));

    let mut loaded = MatchableMaker::load(&path)?;
    let generated = loaded.grab("generated_matchable");
    let names: Vec<_> = generated.variants().iter().map(|v| v.name().to_owned()).collect();
    assert_eq!(names, ["Floor", "Room"]);

    assert_eq!(loaded.get("Room"), maker.get("Room"));
    assert_eq!(loaded.get("Floor"), maker.get("Floor"));
    Ok(())
}

#[test]
fn growing_twice_changes_nothing() {
    let maker = house();
    let mut text = Vec::new();
    maker.write_to(&mut text, &both(), GrowMode::Always).unwrap();
    maker.write_to(&mut text, &both(), GrowMode::Always).unwrap();

    let parsed = MatchableMaker::parse(std::str::from_utf8(&text).unwrap());
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    assert_eq!(parsed.maker.get("Room"), maker.get("Room"));
    assert_eq!(parsed.maker.len(), 3);
}

#[test]
fn cyclic_dependencies_are_left_out() -> anyhow::Result<()> {
    let mut maker = house();
    let a = maker.grab("A");
    a.add_variant("a");
    a.add_spread("B::Type", "b");
    a.set_spread("a", "b", "B::b")?;
    let b = maker.grab("B");
    b.add_variant("b");
    b.add_spread("A", "a");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cycle.txt");
    let result = maker.save_as(&path, &both(), GrowMode::Wrap);

    match result {
        Err(SaveError::CyclicDependencies { skipped }) => assert_eq!(skipped, ["A", "B"]),
        other => panic!("unexpected result {other:?}"),
    }

    let text = std::fs::read_to_string(&path)?;
    assert!(!text.contains("(A,"));
    assert!(!text.contains("(B,"));
    assert!(!text.contains("MATCHABLE_FWD(A)"));
    assert!(text.contains("MATCHABLE(Floor, Tile, Carpet)"));
    assert!(text.contains("MATCHABLE(generated_matchable, A, B, Floor, Room)"));
    Ok(())
}

#[test]
fn nothing_to_save() {
    let maker = house();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.txt");

    assert!(matches!(
        maker.save_as(&path, &Flags::default(), GrowMode::Wrap),
        Err(SaveError::NoContent)
    ));
    assert!(matches!(
        maker.save_as(&path, &both(), None),
        Err(SaveError::NoGrowMode)
    ));
    assert!(!path.exists());
}

#[test]
fn io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing").join("file.txt");

    assert!(matches!(
        house().save_as(&missing, &both(), GrowMode::Wrap),
        Err(SaveError::Io(_))
    ));
    assert!(matches!(
        MatchableMaker::load(&missing),
        Err(LoadError::Io(_))
    ));
}

#[test]
fn syntax_errors_keep_the_rest() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.txt");
    std::fs::write(
        &path,
        "MATCHABLE(T, a, b)\nSET_SPREAD(T, a)\nMATCHABLE_GROW(T, c)\n",
    )?;

    match MatchableMaker::load(&path) {
        Err(LoadError::Syntax { errors, partial }) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].line, 2);
            assert!(matches!(
                errors[0].kind,
                SyntaxErrorKind::ArgumentCount { found: 2, .. }
            ));
            assert_eq!(partial.get("T").map(|t| t.variants().len()), Some(3));
        }
        other => panic!("unexpected result {other:?}"),
    }
    Ok(())
}
