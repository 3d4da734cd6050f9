use matchable::{Matchable, matchable};

#[matchable]
pub enum Outcome {
    Ok,
    Err,
}

#[matchable]
pub enum Failure {
    AlreadyDone,
    OutOfRange,
    Timeout,
}

#[matchable]
pub enum Status {
    Pending,
    Outcome(Outcome),
    Failure(Failure),
    Unknown,
}

#[matchable]
pub enum Everything {
    Status(Status),
    Extra,
}

#[matchable]
pub enum Material {
    Stone,
    Wood,
}

#[matchable(spread(material: Material))]
pub enum Floor {
    #[matchable(material = Material::Stone)]
    Tile,
    #[matchable(material = Material::Wood)]
    Parquet,
    Carpet,
}

#[matchable(spread(floor: Floor), spread_vect(neighbors: Room))]
pub enum Room {
    #[matchable(floor = Floor::Tile, neighbors = [Room::Hallway])]
    Bathroom,
    #[matchable(floor = Floor::Parquet, neighbors = [Room::Hallway])]
    Bedroom,
    #[matchable(neighbors = [Room::Bathroom, Room::Bedroom])]
    Hallway,
}

#[test]
fn merged_indices() {
    assert_eq!(Status::COUNT, 7);
    let names: Vec<_> = Status::variants().iter().map(|s| s.as_str()).collect();
    assert_eq!(
        names,
        ["Pending", "Ok", "Err", "AlreadyDone", "OutOfRange", "Timeout", "Unknown"]
    );
    for (i, status) in Status::variants().iter().enumerate() {
        assert_eq!(status.declaration_index(), i);
    }
    assert_eq!(Status::Unknown.declaration_index(), 6);
    assert_eq!(Status::from(Failure::Timeout).declaration_index(), 5);
}

#[test]
fn merge_preserves_identity() {
    assert_eq!(Status::from(Outcome::Err), Status::from(Outcome::Err));
    assert_ne!(Status::from(Outcome::Err), Status::from(Failure::OutOfRange));

    assert_eq!(
        Status::from_string("Err"),
        Outcome::from_string("Err").map(Status::from)
    );
    assert_eq!(Status::from_string("Pending"), Some(Status::Pending));
    assert_eq!(Status::from(Failure::Timeout).to_string(), "Timeout");
    assert_eq!(
        Status::from_identifier_string("AlreadyDone"),
        Some(Status::Failure(Failure::AlreadyDone))
    );
}

#[test]
fn variant_named_err_parses() {
    assert_eq!("Err".parse::<Outcome>(), Ok(Outcome::Err));
    assert_eq!("Err".parse::<Status>(), Ok(Status::Outcome(Outcome::Err)));
    assert!("Error".parse::<Outcome>().is_err());
}

#[test]
fn try_from_gives_back_the_source() {
    let status: Status = Outcome::Ok.into();
    assert_eq!(Outcome::try_from(status), Ok(Outcome::Ok));
    assert_eq!(Failure::try_from(status), Err(status));
    assert_eq!(Failure::try_from(Status::Pending), Err(Status::Pending));
}

#[test]
fn nested_merges() {
    assert_eq!(Everything::COUNT, 8);
    let timeout = Everything::from(Status::from(Failure::Timeout));
    assert_eq!(timeout.declaration_index(), 5);
    assert_eq!(timeout.as_str(), "Timeout");
    assert_eq!(Everything::from_string("Timeout"), Some(timeout));
    assert_eq!(Everything::Extra.declaration_index(), 7);
}

#[test]
fn merged_lexical_order() {
    let names: Vec<_> = Status::variants_by_lexical_order()
        .iter()
        .map(|s| s.as_str())
        .collect();
    assert_eq!(
        names,
        ["AlreadyDone", "Err", "Ok", "OutOfRange", "Pending", "Timeout", "Unknown"]
    );
}

#[test]
fn spreads() {
    assert_eq!(Room::Bathroom.floor(), Some(Floor::Tile));
    assert_eq!(Room::Hallway.floor(), None);
    assert_eq!(Floor::Carpet.material(), None);
}

#[test]
fn spreads_follow_transitively() {
    let material = Room::Bedroom.floor().and_then(Floor::material);
    assert_eq!(material, Some(Material::Wood));

    let nil: Option<Room> = None;
    assert_eq!(nil.and_then(Room::floor).and_then(Floor::material), None);
}

#[test]
fn spread_vects() {
    assert_eq!(Room::Hallway.neighbors(), &[Room::Bathroom, Room::Bedroom]);
    assert_eq!(Room::Bathroom.neighbors(), &[Room::Hallway]);
    assert!(Room::Hallway
        .neighbors()
        .iter()
        .all(|room| room.neighbors().contains(&Room::Hallway)));
}
