//! Unit tests for deployment grouping.
//!
//! These cover main artefact selection, filter matching order, the handling
//! of generated-descriptor and internal-only artefacts, and the rejection of
//! ambiguous deployments.

use super::{DeploymentGrouper, Grouping};
use crate::artefact::descriptor::{ArtefactDescriptor, RawArtefact};
use crate::artefact::registry::ArtefactRegistry;
use crate::error::DeployerError;
use crate::filter::{ClassifierFilter, DEFAULT_FILTER_NAME, FilterRegistry};
use crate::pom::{Coordinates, PomTemplate};
use rstest::{fixture, rstest};

fn template(artifact_id: &str) -> PomTemplate {
    PomTemplate::new(Coordinates::new("org.example", artifact_id, "1.0"))
}

fn jar() -> ArtefactDescriptor {
    ArtefactDescriptor::new("jar", "jar")
}

fn classified(classifier: &str) -> ArtefactDescriptor {
    jar().with_classifier(classifier)
}

fn files(artefacts: &[RawArtefact]) -> Vec<&str> {
    artefacts.iter().map(|artefact| artefact.file().as_str()).collect()
}

#[fixture]
fn grouper() -> DeploymentGrouper {
    DeploymentGrouper::new("build/poms")
}

#[fixture]
fn filters() -> FilterRegistry {
    FilterRegistry::new(template("app"))
}

fn group(
    grouper: &DeploymentGrouper,
    registry: &ArtefactRegistry,
    filters: &FilterRegistry,
) -> Grouping {
    grouper
        .group(registry.snapshot(), filters)
        .expect("grouping should succeed")
}

#[rstest]
fn default_filter_claims_main_and_drops_internal_only(
    grouper: DeploymentGrouper,
    filters: FilterRegistry,
) {
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "A");
    registry.register(ArtefactDescriptor::new("pom", "pom"), "B");
    registry.register(ArtefactDescriptor::new("ivy", "xml"), "C");

    let grouping = group(&grouper, &registry, &filters);

    assert_eq!(grouping.units.len(), 1);
    let unit = &grouping.units[0];
    assert_eq!(unit.name(), DEFAULT_FILTER_NAME);
    assert_eq!(
        unit.main_artefact().map(|main| main.file().as_str()),
        Some("A")
    );
    assert!(unit.attached_artefacts().is_empty());
    assert_eq!(
        unit.descriptor_artefact().file().as_str(),
        "build/poms/pom-default.xml"
    );
    assert_eq!(unit.pom().coordinates().artifact_id, "app");
    assert_eq!(unit.pom().packaging.as_deref(), Some("jar"));
    assert!(grouping.unclaimed.is_empty());
}

#[rstest]
fn earlier_filter_claims_its_artefacts_first(
    grouper: DeploymentGrouper,
    mut filters: FilterRegistry,
) {
    filters
        .add_filter("sources", ClassifierFilter::new("sources"), template("app-sources"))
        .expect("add filter");
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "A");
    registry.register(classified("sources"), "S");

    let grouping = group(&grouper, &registry, &filters);

    let names: Vec<_> = grouping.units.iter().map(|unit| unit.name()).collect();
    assert_eq!(names, ["sources", DEFAULT_FILTER_NAME]);

    let sources = &grouping.units[0];
    assert!(sources.main_artefact().is_none());
    assert_eq!(files(sources.attached_artefacts()), ["S"]);
    assert_eq!(sources.pom().packaging.as_deref(), Some("pom"));

    let default = &grouping.units[1];
    assert_eq!(
        default.main_artefact().map(|main| main.file().as_str()),
        Some("A")
    );
    assert!(default.attached_artefacts().is_empty());
}

#[rstest]
fn attached_artefacts_keep_registry_order(grouper: DeploymentGrouper, filters: FilterRegistry) {
    let mut registry = ArtefactRegistry::new();
    registry.register(classified("javadoc"), "D");
    registry.register(jar(), "A");
    registry.register(classified("sources"), "S");

    let grouping = group(&grouper, &registry, &filters);

    let unit = &grouping.units[0];
    assert_eq!(
        unit.main_artefact().map(|main| main.file().as_str()),
        Some("A")
    );
    assert_eq!(files(unit.attached_artefacts()), ["D", "S"]);
}

#[rstest]
fn filters_matching_nothing_produce_no_unit(grouper: DeploymentGrouper, mut filters: FilterRegistry) {
    filters
        .add_filter("tests", ClassifierFilter::new("tests"), template("app-tests"))
        .expect("add filter");
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "A");

    let grouping = group(&grouper, &registry, &filters);

    let names: Vec<_> = grouping.units.iter().map(|unit| unit.name()).collect();
    assert_eq!(names, [DEFAULT_FILTER_NAME]);
}

#[rstest]
fn empty_registry_produces_nothing(grouper: DeploymentGrouper, filters: FilterRegistry) {
    let grouping = group(&grouper, &ArtefactRegistry::new(), &filters);
    assert!(grouping.units.is_empty());
    assert!(grouping.unclaimed.is_empty());
}

#[rstest]
fn artefacts_outside_every_filter_are_unclaimed(
    grouper: DeploymentGrouper,
    mut filters: FilterRegistry,
) {
    filters.set_default_filter(|artefact: &ArtefactDescriptor| artefact.classifier().is_none());
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "A");
    registry.register(classified("sources"), "S");

    let grouping = group(&grouper, &registry, &filters);

    assert_eq!(grouping.units.len(), 1);
    assert_eq!(files(&grouping.unclaimed), ["S"]);
}

#[rstest]
fn descriptor_only_matches_do_not_form_a_unit(
    grouper: DeploymentGrouper,
    mut filters: FilterRegistry,
) {
    filters.set_default_filter(|artefact: &ArtefactDescriptor| artefact.artefact_type() == "pom");
    let mut registry = ArtefactRegistry::new();
    registry.register(ArtefactDescriptor::new("pom", "pom"), "B");

    let grouping = group(&grouper, &registry, &filters);

    assert!(grouping.units.is_empty());
    assert_eq!(files(&grouping.unclaimed), ["B"]);
}

#[rstest]
fn classifier_less_non_packaging_artefact_becomes_main(
    grouper: DeploymentGrouper,
    filters: FilterRegistry,
) {
    let mut registry = ArtefactRegistry::new();
    registry.register(ArtefactDescriptor::new("zip", "zip"), "dist.zip");
    registry.register(ArtefactDescriptor::new("zip", "zip").with_classifier("docs"), "docs.zip");

    let grouping = group(&grouper, &registry, &filters);

    let unit = &grouping.units[0];
    assert_eq!(
        unit.main_artefact().map(|main| main.file().as_str()),
        Some("dist.zip")
    );
    assert_eq!(unit.pom().packaging.as_deref(), Some("zip"));
    assert_eq!(files(unit.attached_artefacts()), ["docs.zip"]);
}

#[rstest]
fn packaging_artefact_wins_over_earlier_plain_artefact(
    grouper: DeploymentGrouper,
    filters: FilterRegistry,
) {
    let mut registry = ArtefactRegistry::new();
    registry.register(ArtefactDescriptor::new("zip", "zip"), "dist.zip");
    registry.register(ArtefactDescriptor::new("war", "war"), "app.war");

    let grouping = group(&grouper, &registry, &filters);

    let unit = &grouping.units[0];
    assert_eq!(
        unit.main_artefact().map(|main| main.file().as_str()),
        Some("app.war")
    );
    assert_eq!(files(unit.attached_artefacts()), ["dist.zip"]);
}

#[rstest]
fn duplicate_type_and_classifier_is_rejected(grouper: DeploymentGrouper, filters: FilterRegistry) {
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "A");
    registry.register(classified("sources"), "S1");
    registry.register(classified("sources"), "S2");

    let err = grouper
        .group(registry.snapshot(), &filters)
        .expect_err("duplicates should be rejected");

    assert!(matches!(
        err,
        DeployerError::DuplicateArtefact { ref unit, .. } if unit == DEFAULT_FILTER_NAME
    ));
    assert!(err.to_string().contains("S2"));
}

#[rstest]
fn second_packaging_artefact_is_rejected(grouper: DeploymentGrouper, filters: FilterRegistry) {
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "app.jar");
    registry.register(ArtefactDescriptor::new("war", "war"), "app.war");

    let err = grouper
        .group(registry.snapshot(), &filters)
        .expect_err("two main artefacts should be rejected");

    assert!(matches!(err, DeployerError::MultipleMainArtefacts { .. }));
}

#[rstest]
fn same_artefacts_in_separate_units_do_not_clash(
    grouper: DeploymentGrouper,
    mut filters: FilterRegistry,
) {
    filters
        .add_filter(
            "server",
            |artefact: &ArtefactDescriptor| artefact.artefact_type() == "war",
            template("server"),
        )
        .expect("add filter");
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "app.jar");
    registry.register(ArtefactDescriptor::new("war", "war"), "app.war");

    let grouping = group(&grouper, &registry, &filters);

    let mains: Vec<_> = grouping
        .units
        .iter()
        .filter_map(|unit| unit.main_artefact().map(|main| main.file().as_str()))
        .collect();
    assert_eq!(mains, ["app.war", "app.jar"]);
}

#[rstest]
fn every_artefact_lands_in_at_most_one_unit(
    grouper: DeploymentGrouper,
    mut filters: FilterRegistry,
) {
    filters
        .add_filter("everything", |_: &ArtefactDescriptor| true, template("all"))
        .expect("add filter");
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "A");
    registry.register(classified("sources"), "S");

    let grouping = group(&grouper, &registry, &filters);

    let names: Vec<_> = grouping.units.iter().map(|unit| unit.name()).collect();
    assert_eq!(names, ["everything"]);
    assert_eq!(files(grouping.units[0].attached_artefacts()), ["S"]);
}

#[rstest]
fn deactivated_filters_are_skipped(grouper: DeploymentGrouper, mut filters: FilterRegistry) {
    filters
        .add_filter("sources", ClassifierFilter::new("sources"), template("app-sources"))
        .expect("add filter");
    filters.deactivate("sources").expect("deactivate");
    let mut registry = ArtefactRegistry::new();
    registry.register(jar(), "A");
    registry.register(classified("sources"), "S");

    let grouping = group(&grouper, &registry, &filters);

    assert_eq!(grouping.units.len(), 1);
    assert_eq!(files(grouping.units[0].attached_artefacts()), ["S"]);
}
