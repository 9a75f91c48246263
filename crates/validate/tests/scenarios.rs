//! Validation of complete decks

use mcdeck_input::{parse, serialize, Document};
use mcdeck_validate::{
    exit_code, validate, validate_one, worst, Check, Finding, NumberingScheme, Reference,
    Severity, ValidationOptions,
};
use rstest::{fixture, rstest};

const MINIMAL: &str = "simple problem
10 0 -1 imp:n=1
20 0  1 imp:n=0

1 so 1.0

mode n
nps 1000
sdef
";

const WATER: &str = "water sphere
1 1 -1.0 -1 imp:n=1
2 0 1 imp:n=0

1 so 10

m1 1001.80c 2 8016.80c 1
mode n
nps 100
";

#[fixture]
fn options() -> ValidationOptions {
    ValidationOptions::new()
}

fn findings_of(text: &str, options: &ValidationOptions) -> Vec<Finding> {
    validate(&parse(text).unwrap(), options)
}

fn of_check(findings: &[Finding], check: Check) -> Vec<&Finding> {
    findings.iter().filter(|f| f.check == check).collect()
}

#[rstest]
fn minimal_deck_is_clean(options: ValidationOptions) {
    let findings = findings_of(MINIMAL, &options);
    assert!(findings.is_empty(), "{findings:?}");
    assert_eq!(exit_code(&findings), 0);
}

#[rstest]
fn undefined_surface_is_fatal(options: ValidationOptions) {
    let findings = findings_of(&MINIMAL.replace("10 0 -1", "10 0 -2"), &options);
    assert_eq!(findings.len(), 1);

    let finding = &findings[0];
    assert_eq!(finding.check, Check::SurfaceResolution);
    assert_eq!(finding.severity, Severity::Fatal);
    assert!(finding.message.contains("cell 10"));
    assert!(finding.message.contains("surface 2"));
    assert_eq!(
        finding.references,
        vec![Reference::Cell(10), Reference::Surface(2)]
    );
    assert_eq!(exit_code(&findings), 1);
}

#[rstest]
// case 1
#[case("no cells\n\n1 so 1.0\n\nmode n\nnps 10\n", "deck defines no cells")]
// case 2
#[case("no surfaces\n10 0 -1 imp:n=1\n\n\nmode n\nnps 10\n", "deck defines no surfaces")]
fn empty_block_is_fatal(options: ValidationOptions, #[case] text: &str, #[case] message: &str) {
    let findings = findings_of(text, &options);
    let structure = of_check(&findings, Check::BlockStructure);
    assert_eq!(structure.len(), 1, "{structure:?}");
    assert_eq!(structure[0].severity, Severity::Fatal);
    assert_eq!(structure[0].message, message);
    assert_eq!(exit_code(&findings), 1);
}

#[rstest]
fn unparsable_cell_is_skipped_with_an_error(options: ValidationOptions) {
    let text = MINIMAL.replace("20 0  1 imp:n=0\n", "20 0  1 imp:n=0\n30 x y\n");
    let document = parse(&text).unwrap();
    assert_eq!(document.cells().len(), 2);

    let findings = validate(&document, &options);
    let syntax = of_check(&findings, Check::CardSyntax);
    assert_eq!(syntax.len(), 1);
    assert_eq!(syntax[0].severity, Severity::Error);
    assert!(
        syntax[0].message.starts_with("cell card on line 4 skipped:"),
        "{}",
        syntax[0].message
    );
    assert_eq!(syntax[0].references, vec![Reference::Line(4)]);
}

#[rstest]
fn orphan_continuation_is_a_warning(options: ValidationOptions) {
    let text = MINIMAL.replace("\n\n1 so 1.0", "\n\n      2.0 3.0\n1 so 1.0");
    let findings = findings_of(&text, &options);
    let syntax = of_check(&findings, Check::CardSyntax);
    assert_eq!(syntax.len(), 1);
    assert_eq!(syntax[0].severity, Severity::Warning);
    assert_eq!(syntax[0].message, "line 5 continues nothing and was ignored");
    assert_eq!(syntax[0].references, vec![Reference::Line(5)]);
    assert_eq!(exit_code(&findings), 0);
}

#[rstest]
// case 1
#[case("kcode 1000 1.0 4000000000j 50")]
// case 2
#[case("imp:n 1 4000000000r")]
fn oversized_shorthand_is_unreadable(options: ValidationOptions, #[case] card: &str) {
    let text = MINIMAL.replace("sdef\n", &format!("sdef\n{card}\n"));
    let findings = findings_of(&text, &options);
    let syntax = of_check(&findings, Check::CardSyntax);
    assert_eq!(syntax.len(), 1, "{syntax:?}");
    assert_eq!(syntax[0].severity, Severity::Error);
    assert!(syntax[0].message.contains("can not be read"), "{}", syntax[0].message);
    assert!(syntax[0].message.contains("too many entries"), "{}", syntax[0].message);
}

#[rstest]
fn wrong_surface_parameter_count(options: ValidationOptions) {
    let findings = findings_of(&MINIMAL.replace("1 so 1.0", "1 so 1.0 2.0"), &options);
    let surfaces = of_check(&findings, Check::SurfaceParameters);
    assert_eq!(surfaces.len(), 1);
    assert_eq!(surfaces[0].severity, Severity::Error);
    assert_eq!(surfaces[0].message, "surface 1 (so) has 2 parameters, expected 1");
    assert_eq!(
        surfaces[0].remediation.as_deref(),
        Some("give surface 1 the parameters a so needs")
    );
    assert_eq!(surfaces[0].references, vec![Reference::Surface(1)]);
}

#[rstest]
fn duplicate_cell_is_fatal(options: ValidationOptions) {
    let findings = findings_of(&MINIMAL.replace("20 0  1", "10 0  1"), &options);
    let duplicates = of_check(&findings, Check::DuplicateIdentity);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].severity, Severity::Fatal);
    assert!(duplicates[0].message.contains("cell 10"));
    assert!(duplicates[0].references.contains(&Reference::Cell(10)));
}

#[rstest]
fn short_continuation_is_fatal(options: ValidationOptions) {
    let findings = findings_of(&MINIMAL.replace("10 0 -1 imp:n=1", "10 0 -1\n    imp:n=1"), &options);
    let formatting = of_check(&findings, Check::ContinuationFormatting);
    assert_eq!(formatting.len(), 1);
    assert_eq!(formatting[0].severity, Severity::Fatal);
    assert!(formatting[0].references.contains(&Reference::Line(3)));
}

#[rstest]
fn universe_cycle_is_fatal(options: ValidationOptions) {
    let text = "cycle
1 0 -1 u=1 fill=2 imp:n=1
2 0 -2 u=2 fill=1 imp:n=1
3 0 -3 fill=1 imp:n=1
4 0 3 imp:n=0

1 so 1
2 so 2
3 so 3

mode n
nps 10
";
    let findings = findings_of(text, &options);
    let cycles = of_check(&findings, Check::UniverseCycle);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].severity, Severity::Fatal);
    assert!(cycles[0].message.contains("{1, 2}"), "{}", cycles[0].message);
    assert_eq!(
        cycles[0].references,
        vec![Reference::Universe(1), Reference::Universe(2)]
    );
    assert!(of_check(&findings, Check::UniverseFillResolution).is_empty());
}

#[rstest]
fn undefined_fill_is_fatal(options: ValidationOptions) {
    let text = MINIMAL.replace("10 0 -1 imp:n=1", "10 0 -1 fill=4 imp:n=1");
    let findings = findings_of(&text, &options);
    let fills = of_check(&findings, Check::UniverseFillResolution);
    assert_eq!(fills.len(), 1);
    assert!(fills[0].references.contains(&Reference::Universe(4)));
    assert!(fills[0].references.contains(&Reference::Cell(10)));
}

fn lattice(fill: &str) -> String {
    format!(
        "lattice
1 0 -1 fill=5 imp:n=1
2 0 -2 u=5 lat=1 fill={fill} imp:n=1
3 0 -3 u=7 imp:n=1
4 0 1 imp:n=0

1 rpp -3 3 -3 3 -1 1
2 rpp -1 1 -1 1 -1 1
3 so 0.5

mode n
nps 10
"
    )
}

#[rstest]
// case 1
#[case("-1:1 -1:1 0:0 7 2R 7 4R", Some("has 8 entries, expected 3·3·1 = 9"))]
// case 2
#[case("-1:1 -1:1 0:0 7 2R 7 5R", None)]
// case 3
#[case("-2:2 -2:2 0:0 7 24R", None)]
// case 4
#[case("0:1 0:0 0:0 7 7 7", Some("has 3 entries, expected 2·1·1 = 2"))]
// case 5
#[case(
    "-2000000000:2000000000 -2000000000:2000000000 -2000000000:2000000000 7",
    Some("ranges cover more elements than can be counted")
)]
// case 6
#[case("0:0 0:0 0:0 7 4000000000r", Some("has 4000000001 entries, expected 1·1·1 = 1"))]
// case 7
#[case("0:0 0:0 0:0 7 4294967295r 7 4294967295r", Some("has 8589934592 entries"))]
fn lattice_fill_cardinality(
    options: ValidationOptions,
    #[case] fill: &str,
    #[case] expected: Option<&str>,
) {
    let findings = findings_of(&lattice(fill), &options);
    let lattices = of_check(&findings, Check::LatticeCardinality);
    match expected {
        Some(message) => {
            assert_eq!(lattices.len(), 1);
            assert_eq!(lattices[0].severity, Severity::Fatal);
            assert!(lattices[0].message.contains(message), "{}", lattices[0].message);
            assert_eq!(lattices[0].references, vec![Reference::Cell(2)]);
        }
        None => assert!(lattices.is_empty(), "{lattices:?}"),
    }
}

#[rstest]
fn missing_thermal_binding(options: ValidationOptions) {
    let findings = findings_of(WATER, &options);
    assert_eq!(findings.len(), 1, "{findings:?}");

    let finding = &findings[0];
    assert_eq!(finding.check, Check::ThermalBinding);
    assert_eq!(finding.severity, Severity::Error);
    assert!(finding.message.contains("hydrogen (1001.80c)"));
    assert!(finding
        .remediation
        .as_deref()
        .unwrap()
        .contains("mt1 h-h2o.40t"));
    assert_eq!(finding.references, vec![Reference::Material(1)]);
}

#[rstest]
fn thermal_binding_not_needed_without_neutrons(options: ValidationOptions) {
    let text = WATER.replace("mode n", "mode p").replace("imp:n", "imp:p");
    let findings = findings_of(&text, &options);
    assert!(of_check(&findings, Check::ThermalBinding).is_empty());
}

#[rstest]
fn bound_water_is_clean(options: ValidationOptions) {
    let text = WATER.replace("mode n", "mt1 h-h2o.40t\nmode n");
    let findings = findings_of(&text, &options);
    assert!(findings.is_empty(), "{findings:?}");
}

#[rstest]
// case 1: configured temperature
#[case("1 1 -1.0 -1 imp:n=1", Some(600.0), true)]
// case 2: cell temperature of 600 K given in MeV
#[case("1 1 -1.0 -1 imp:n=1 tmp=5.1704e-8", None, true)]
// case 3: within tolerance of the library
#[case("1 1 -1.0 -1 imp:n=1", Some(320.0), false)]
// case 4: no temperature known
#[case("1 1 -1.0 -1 imp:n=1", None, false)]
fn thermal_temperature(
    #[case] cell: &str,
    #[case] temperature: Option<f64>,
    #[case] flagged: bool,
) {
    let text = WATER
        .replace("1 1 -1.0 -1 imp:n=1", cell)
        .replace("mode n", "mt1 h-h2o.40t\nmode n");
    let mut options = ValidationOptions::new();
    if let Some(t) = temperature {
        options = options.with_temperature(t);
    }

    let findings = findings_of(&text, &options);
    let warnings = of_check(&findings, Check::ThermalTemperature);
    if flagged {
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert!(warnings[0]
            .remediation
            .as_deref()
            .unwrap()
            .contains("h-h2o.46t"));
        assert_eq!(exit_code(&findings), 0);
    } else {
        assert!(warnings.is_empty(), "{warnings:?}");
    }
}

#[rstest]
fn unknown_thermal_library(options: ValidationOptions) {
    let text = WATER.replace("mode n", "mt1 unobtanium.99t\nmode n");
    let findings = findings_of(&text, &options);
    let bindings = of_check(&findings, Check::ThermalBinding);
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].severity, Severity::Warning);
    assert!(bindings[0].message.contains("unobtanium.99t"));
}

#[rstest]
// case 1
#[case("m1 1001.80c 2 8016.80c -1", Severity::Error, "mixes atom")]
// case 2
#[case("m1 1001.80c 2 8016.99c 1", Severity::Warning, ".99c")]
// case 3
#[case("m1 1001.80c 2 8016.80c 0", Severity::Warning, "zero fraction")]
// case 4
#[case("m1 1001.80c 2 150000.80c 1", Severity::Error, "unknown element")]
fn material_composition(
    options: ValidationOptions,
    #[case] card: &str,
    #[case] severity: Severity,
    #[case] message: &str,
) {
    let text = WATER
        .replace("m1 1001.80c 2 8016.80c 1", card)
        .replace("mode n", "mt1 h-h2o.40t\nmode n");
    let findings = findings_of(&text, &options);
    let composition = of_check(&findings, Check::MaterialComposition);
    assert_eq!(composition.len(), 1, "{composition:?}");
    assert_eq!(composition[0].severity, severity);
    assert!(composition[0].message.contains(message), "{}", composition[0].message);
}

#[rstest]
fn undefined_material_is_fatal(options: ValidationOptions) {
    let text = WATER.replace("1 1 -1.0", "1 2 -1.0");
    let findings = findings_of(&text, &options);
    let materials = of_check(&findings, Check::MaterialResolution);
    assert_eq!(materials.len(), 1);
    assert_eq!(
        materials[0].references,
        vec![Reference::Cell(1), Reference::Material(2)]
    );
}

#[rstest]
fn complement_of_undefined_cell(options: ValidationOptions) {
    let text = MINIMAL.replace("20 0  1", "20 0  #30");
    let findings = findings_of(&text, &options);
    let complements = of_check(&findings, Check::ComplementResolution);
    assert_eq!(complements.len(), 1);
    assert!(complements[0].message.contains("cell 30"));
}

#[rstest]
fn transformations(options: ValidationOptions) {
    let text = MINIMAL
        .replace("1 so 1.0", "1 2 so 1.0")
        .replace("sdef", "sdef\ntr1 0 0 0\n*tr1 0 0 0");
    let findings = findings_of(&text, &options);
    let transforms = of_check(&findings, Check::TransformResolution);
    assert_eq!(transforms.len(), 2, "{transforms:?}");

    assert_eq!(transforms[0].severity, Severity::Fatal);
    assert_eq!(transforms[0].references, vec![Reference::Transform(1)]);
    assert_eq!(transforms[1].severity, Severity::Error);
    assert_eq!(
        transforms[1].references,
        vec![Reference::Surface(1), Reference::Transform(2)]
    );
}

#[rstest]
fn tally_modifiers(options: ValidationOptions) {
    let text = MINIMAL.replace(
        "sdef",
        "sdef\nf4:n 10\ne14 1 2\nde4 1 2 3\ndf4 1 2\ne0 1 10",
    );
    let findings = findings_of(&text, &options);
    let tallies = of_check(&findings, Check::TallyConsistency);
    assert_eq!(tallies.len(), 2, "{tallies:?}");
    assert!(tallies[0].message.contains("E14"));
    assert!(tallies[1].message.contains("DE4 has 3 energies but DF4 has 2"));
}

#[rstest]
fn importance_coverage_is_informational(options: ValidationOptions) {
    let findings = findings_of(&MINIMAL.replace("mode n", "mode n p"), &options);
    assert_eq!(findings.len(), 2);
    assert!(findings.iter().all(|f| f.check == Check::ImportanceCoverage));
    assert_eq!(worst(&findings), Some(Severity::Info));
    assert_eq!(
        findings[0].message,
        "cell 10 has no importance for p, defaulting to 1"
    );
    assert_eq!(exit_code(&findings), 0);
}

#[rstest]
fn numbering_scheme_warnings() {
    let scheme = NumberingScheme::from_json_str(
        r#"{ "name": "site", "cells": { "digits": [3] }, "surfaces": { "digits": [1] } }"#,
    )
    .unwrap();
    let options = ValidationOptions::new().with_numbering(scheme);

    let findings = findings_of(MINIMAL, &options);
    assert_eq!(findings.len(), 2);
    assert!(findings
        .iter()
        .all(|f| f.check == Check::NumberingScheme && f.severity == Severity::Warning));
    assert!(findings[0].message.contains("cell 10 has 2 digits, expected 3"));
    assert!(findings[0].message.contains("site"));
    assert_eq!(exit_code(&findings), 0);
}

#[rstest]
fn selected_checks_only() {
    let text = MINIMAL.replace("10 0 -1", "10 0 -2").replace("mode n", "mode n p");
    let options = ValidationOptions::new().only(&[Check::ImportanceCoverage]);
    let findings = findings_of(&text, &options);
    assert!(findings.iter().all(|f| f.check == Check::ImportanceCoverage));

    let options = ValidationOptions::new().without(Check::ImportanceCoverage);
    let findings = findings_of(&text, &options);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].check, Check::SurfaceResolution);
}

#[rstest]
fn single_check(options: ValidationOptions) {
    let doc = parse(WATER).unwrap();
    assert!(validate_one(&doc, Check::SurfaceResolution, &options).is_empty());
    assert_eq!(validate_one(&doc, Check::ThermalBinding, &options).len(), 1);
}

#[rstest]
fn validation_survives_serialisation(options: ValidationOptions) {
    let text = "mixed problems
1 1 -1.0 -1 -9 imp:n=1
2 0 1 #7 imp:n=1
3 0 -3 u=4 imp:n=1
4 0 3 imp:n=0

1 so 10
3 so 20

m1 1001.80c 2 8016.80c 1
mode n p
f4:n 1
de4 1 2
nps 100
";
    let doc: Document = parse(text).unwrap();
    let first = validate(&doc, &options);
    assert!(!first.is_empty());

    let second = validate(&parse(&serialize(&doc)).unwrap(), &options);
    assert_eq!(first, second);
}
