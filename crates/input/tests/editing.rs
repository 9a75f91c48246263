//! Integration tests for the editing API

use mcdeck_input::{parse, serialize, Document, Error, Geometry, Sense, SurfaceKind};
use rstest::{fixture, rstest};

#[fixture]
fn assembly() -> Document {
    parse(
        "assembly
1 1 -10.4 -1 u=1 imp:n=1
2 2 -1.0 1 u=1 imp:n=1
3 0 -2 3 -4 5 u=2 lat=1 imp:n=1 fill=0:2 0:2 0:0 1 1 3 1 1R 3 1 2R
4 3 -8.0 -6 u=3 imp:n=1
5 0 -7 fill=2 imp:n=1
6 0 7 imp:n=0

1 cz 0.4
2 px 0
3 px 1.26
4 py 0
5 py 1.26
6 cz 0.5
7 so 50

m1 92235.80c 1
m2 1001.80c 2 8016.80c 1
m3 26000.80c 1
",
    )
    .unwrap()
}

#[rstest]
#[case("-1 2 -3", 2, 99, "-1 99 -3")]
#[case("-1 2 -3", 4, 99, "-1 2 -3")]
#[case("1 : #(2 -1)", 1, 7, "7 : #(2 -7)")]
#[case("+2.3 -2", 2, 5, "+5.3 -5")]
fn substitute_surface(
    #[case] text: &str,
    #[case] old: u32,
    #[case] new: u32,
    #[case] expected: &str,
) {
    let geometry: Geometry = text.parse().unwrap();
    let substituted = geometry.substitute_surface(old, new);
    assert_eq!(substituted.to_string(), expected);
    // the original is untouched
    assert_eq!(geometry.to_string(), text);
}

#[test]
fn substitution_preserves_sense() {
    let geometry: Geometry = "-1 2 +3".parse().unwrap();
    let senses: Vec<Sense> = geometry
        .substitute_surface(2, 99)
        .half_spaces()
        .iter()
        .map(|h| h.sense)
        .collect();
    assert_eq!(senses, vec![Sense::Negative, Sense::Bare, Sense::Positive]);
}

#[rstest]
fn swap_universe_in_lattice(mut assembly: Document) {
    assert_eq!(assembly.replace_universe_in_lattice(3, 3, 1).unwrap(), 2);
    let expanded = assembly.cell(3).unwrap().fill().unwrap().expanded();
    assert_eq!(expanded, vec![1; 9]);
    assert!(matches!(
        assembly.replace_universe_in_lattice(5, 2, 1),
        Err(Error::NotALattice(5))
    ));
    assert!(matches!(
        assembly.replace_universe_in_lattice(42, 2, 1),
        Err(Error::CellNotFound(42))
    ));
}

#[rstest]
fn add_and_use_a_surface(mut assembly: Document) {
    let number = assembly.add_surface(SurfaceKind::So, vec![60.0]).unwrap();
    assert_eq!(number, 8);
    assert!(matches!(
        assembly.add_surface(SurfaceKind::Rcc, vec![1.0; 3]),
        Err(Error::InvalidParameterCount { found: 3, .. })
    ));

    let reread = parse(&serialize(&assembly)).unwrap();
    assert_eq!(reread.surface(8).unwrap().kind, SurfaceKind::So);
}

#[rstest]
fn densities_over_a_range(mut assembly: Document) {
    assert_eq!(assembly.set_density_for_materials(2..=3, -5.0).unwrap(), 2);
    assert_eq!(assembly.cell(1).unwrap().density(), Some(-10.4));
    assert_eq!(assembly.cell(2).unwrap().density(), Some(-5.0));
    assert_eq!(assembly.cell(4).unwrap().density(), Some(-5.0));
    assert_eq!(assembly.revision(), 2);
}

#[rstest]
fn edits_refresh_the_graph(mut assembly: Document) {
    let before = assembly.cross_reference_graph().clone();
    assert_eq!(before.surface_uses[&7].len(), 2);

    assembly.renumber_surface(7, 70).unwrap();
    let after = assembly.cross_reference_graph();
    assert!(!before.is_current(&assembly));
    assert!(after.is_current(&assembly));
    assert!(!after.surface_uses.contains_key(&7));
    assert_eq!(after.surface_uses[&70].len(), 2);
    assert!(after.find_cycle().is_none());
}

#[rstest]
fn removing_referenced_surfaces_is_refused(mut assembly: Document) {
    match assembly.remove_surface(1) {
        Err(Error::SurfaceInUse { surface, cells }) => {
            assert_eq!(surface, 1);
            assert_eq!(cells, vec![1, 2]);
        }
        other => panic!("unexpected {other:?}"),
    }
    assembly.remove_cell(1).unwrap();
    assembly.remove_cell(2).unwrap();
    assert!(assembly.remove_surface(1).is_ok());
}
