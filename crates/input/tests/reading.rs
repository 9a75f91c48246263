//! Integration tests for reading complete decks

use mcdeck_input::{parse, Block, Document, Fill, Geometry, Issue, Namespace, Particle, Sense};
use rstest::{fixture, rstest};

const MINIMAL: &str = "simple problem
10 0 -1 imp:n=1
20 0  1 imp:n=0

1 so 1.0

mode n
nps 1000
sdef
";

#[fixture]
fn minimal() -> Document {
    parse(MINIMAL).unwrap()
}

#[rstest]
fn minimal_deck(minimal: Document) {
    assert_eq!(minimal.title, "simple problem");
    assert_eq!(minimal.cells().len(), 2);
    assert_eq!(minimal.surfaces().len(), 1);
    assert_eq!(minimal.data_cards().len(), 3);
    assert!(minimal.diagnostics().is_clean());
    assert_eq!(minimal.diagnostics().block_count, 3);

    let order: Vec<u32> = minimal.cells().keys().copied().collect();
    assert_eq!(order, vec![10, 20]);
    assert_eq!(minimal.mode().unwrap(), vec![Particle::Neutron]);
}

#[rstest]
fn bare_references_are_negative(minimal: Document) {
    let geometry = minimal.cell(20).unwrap().geometry().unwrap();
    let leaf = geometry.half_spaces()[0];
    assert_eq!(leaf.sense, Sense::Bare);
    assert!(leaf.sense.is_negative());
}

#[rstest]
#[case("t\n1 0 -1\n\n1 so 1\n")]
#[case("t\n1 0 -1\n")]
#[case("")]
#[case("c only comments\nc here\n")]
fn structural_errors(#[case] text: &str) {
    assert!(parse(text).is_err());
}

#[rstest]
#[case("    ", 4, false)] // short indent is joined but flagged
#[case("     ", 5, true)] // five spaces is a clean continuation
#[case("        ", 8, true)]
fn continuation_indent(#[case] indent: &str, #[case] spaces: usize, #[case] clean: bool) {
    let text = format!("t\n10 0 -1\n{indent}imp:n=1\n\n1 so 1\n\nnps 1\n");
    let doc = parse(&text).unwrap();
    assert_eq!(doc.cells().len(), 1);
    assert_eq!(doc.cell(10).unwrap().importance(Particle::Neutron), Some(1.0));
    assert_eq!(doc.diagnostics().is_clean(), clean);
    if !clean {
        assert_eq!(
            doc.diagnostics().issues,
            vec![Issue::ShortIndent {
                line: 3,
                indent: spaces
            }]
        );
    }
}

#[test]
fn ampersand_continuation() {
    let doc = parse("t\n10 0 -1 &\nimp:n=1\n20 0 1\n&imp:n=0\n\n1 so 1\n\nnps 1\n").unwrap();
    assert!(doc.diagnostics().is_clean());
    assert_eq!(doc.cell(10).unwrap().importance(Particle::Neutron), Some(1.0));
    assert_eq!(doc.cell(20).unwrap().importance(Particle::Neutron), Some(0.0));
}

#[test]
fn bad_cards_are_skipped() {
    let doc = parse("t\n10 0 -1 imp:n=1\n20 0 -1 colour=blue\n30 0 1 imp:n=0\n\n1 so 1\n2 torus 1\n\nnps 1\n")
        .unwrap();
    assert_eq!(doc.cells().len(), 2);
    assert_eq!(doc.surfaces().len(), 1);

    let skipped: Vec<(usize, Block)> = doc
        .diagnostics()
        .issues
        .iter()
        .filter_map(|i| match i {
            Issue::SkippedCard { line, block, .. } => Some((*line, *block)),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![(3, Block::Cells), (7, Block::Surfaces)]);
}

#[test]
fn duplicates_keep_the_first_definition() {
    let doc = parse("t\n10 0 -1\n10 0 1\n\n1 so 1\n\nm1 1001 1\nm1 8016 1\nnps 1\n").unwrap();
    assert_eq!(doc.cells().len(), 1);
    assert_eq!(doc.cell(10).unwrap().geometry().unwrap().to_string(), "-1");
    assert_eq!(doc.data_card("m1").unwrap().entries, vec!["1001", "1"]);

    let duplicates: Vec<(Namespace, String)> = doc
        .diagnostics()
        .issues
        .iter()
        .filter_map(|i| match i {
            Issue::Duplicate { namespace, id, .. } => Some((*namespace, id.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        duplicates,
        vec![(Namespace::Cell, "10".to_string()), (Namespace::Material, "1".to_string())]
    );
}

#[test]
fn lattice_fill_is_structured() {
    let doc = parse(
        "lattice
1 0 -1 fill=1
2 0 -2 2 -3 3 u=1 lat=1 fill=-1:1 -1:1 0:0 7 2R 7 4R
3 0 -4 u=7

1 so 10
2 px -1
3 py -1
4 so 1

nps 1
",
    )
    .unwrap();

    let cell = doc.cell(2).unwrap();
    let surfaces: Vec<u32> = cell.referenced_surfaces_of_boundary().into_iter().collect();
    assert_eq!(surfaces, vec![2, 3]);

    let fill = cell.fill().unwrap();
    assert!(matches!(fill, Fill::Array { .. }));
    assert_eq!(fill.spans(), [3, 3, 1]);
    assert_eq!(fill.expanded().len(), 8);
    assert_eq!(fill.entry_count(), 8);
    assert_eq!(fill.expected_len(), Some(9));
}

#[test]
fn huge_fill_repeat_is_read_without_expanding() {
    let doc = parse(
        "huge repeat
1 0 -1 fill=1
2 0 -2 u=1 lat=1 fill=0:0 0:0 0:0 1 4000000000r
3 0 -3 u=1

1 so 10
2 px 1
3 so 1

nps 1
",
    )
    .unwrap();

    let fill = doc.cell(2).unwrap().fill().unwrap();
    assert_eq!(fill.entry_count(), 4_000_000_001);
    assert_eq!(fill.expected_len(), Some(1));
    assert_eq!(fill.universes(), vec![1]);
    let graph = doc.cross_reference_graph();
    assert_eq!(graph.lattice_fills[&2], vec![1]);
}

#[test]
fn dollar_only_line_ends_a_block() {
    let doc = parse(
        "t
10 0 -1 imp:n=1
20 0 1 imp:n=0
   $ end of cells
1 so 1.0

mode n
nps 10
",
    )
    .unwrap();

    assert_eq!(doc.cells().len(), 2);
    assert_eq!(doc.surfaces().len(), 1);
    assert!(doc.data_card("mode").is_some());
    assert!(doc.data_card("nps").is_some());
    assert!(doc.diagnostics().is_clean());
}

#[test]
fn comments_and_tabs() {
    let doc = parse("t\nc a comment\n10 0 -1 $ trailing\n\timp:n=1\nC\n\n1 so 1 $ sphere\n\nnps 1 $ histories\n")
        .unwrap();
    assert!(doc.diagnostics().is_clean());
    assert_eq!(doc.cell(10).unwrap().to_string(), "10 0 -1 imp:n=1");
    assert_eq!(doc.data_card("nps").unwrap().entries, vec!["1"]);
}

#[test]
fn geometry_with_complements_and_facets() {
    let doc = parse("t\n1 0 -1.2 #2 (3:-4)\n2 0 -5\n\n1 rpp 0 1 0 1 0 1\n3 px 0\n4 px 1\n5 so 1\n\nnps 1\n")
        .unwrap();
    let geometry: &Geometry = doc.cell(1).unwrap().geometry().unwrap();
    assert_eq!(geometry.referenced_surfaces().into_iter().collect::<Vec<_>>(), vec![1, 3, 4]);
    assert_eq!(geometry.referenced_cells().into_iter().collect::<Vec<_>>(), vec![2]);
}
