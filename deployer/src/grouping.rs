//! Partitioning of raw artefacts into deployment units.
//!
//! Active filters are visited in matching order (named filters by
//! activation, then the default filter). Each filter claims the unclaimed
//! artefacts its predicate accepts and turns them into one
//! [`DeploymentUnit`]. Whatever no filter claims is reported back as
//! unclaimed and logged as a warning.

use crate::artefact::descriptor::{ArtefactDescriptor, ArtefactKey, DESCRIPTOR_TYPE, RawArtefact};
use crate::error::{DeployerError, Result};
use crate::filter::{FilterRegistry, PomFilter};
use crate::pom::PomTemplate;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::collections::HashMap;

/// One publishable unit: a descriptor plus the artefacts it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentUnit {
    name: String,
    descriptor: RawArtefact,
    pom: PomTemplate,
    main: Option<RawArtefact>,
    attached: Vec<RawArtefact>,
}

impl DeploymentUnit {
    /// Name of the filter that formed this unit.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The descriptor artefact written from [`Self::pom`] before publication.
    #[must_use]
    pub fn descriptor_artefact(&self) -> &RawArtefact {
        &self.descriptor
    }

    /// The materialised template for this unit.
    #[must_use]
    pub fn pom(&self) -> &PomTemplate {
        &self.pom
    }

    /// Mutable access to the materialised template.
    pub fn pom_mut(&mut self) -> &mut PomTemplate {
        &mut self.pom
    }

    /// The main artefact, if the unit has one.
    #[must_use]
    pub fn main_artefact(&self) -> Option<&RawArtefact> {
        self.main.as_ref()
    }

    /// Replace the main artefact.
    pub fn set_main_artefact(&mut self, main: Option<RawArtefact>) {
        self.main = main;
    }

    /// Attached artefacts in registry order.
    #[must_use]
    pub fn attached_artefacts(&self) -> &[RawArtefact] {
        &self.attached
    }

    /// Mutable access to the attached artefacts.
    pub fn attached_artefacts_mut(&mut self) -> &mut Vec<RawArtefact> {
        &mut self.attached
    }
}

/// Result of one grouping pass.
#[derive(Debug, Default)]
pub struct Grouping {
    /// Units in filter matching order.
    pub units: Vec<DeploymentUnit>,
    /// Artefacts no active filter claimed.
    pub unclaimed: Vec<RawArtefact>,
}

/// Forms deployment units from a registry snapshot.
#[derive(Debug, Clone)]
pub struct DeploymentGrouper {
    pom_dir: Utf8PathBuf,
}

impl DeploymentGrouper {
    /// Create a grouper whose descriptors live in `pom_dir`.
    #[must_use]
    pub fn new(pom_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            pom_dir: pom_dir.into(),
        }
    }

    /// Directory receiving the generated descriptors.
    #[must_use]
    pub fn pom_dir(&self) -> &Utf8Path {
        &self.pom_dir
    }

    /// Path of the descriptor generated for the unit named `name`.
    #[must_use]
    pub fn descriptor_path(&self, name: &str) -> Utf8PathBuf {
        self.pom_dir.join(format!("pom-{name}.xml"))
    }

    /// Partition `artefacts` among the active filters of `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`DeployerError::DuplicateArtefact`] when one unit would hold
    /// two artefacts with the same type and classifier, and
    /// [`DeployerError::MultipleMainArtefacts`] when it would hold two
    /// classifier-less packaging artefacts.
    pub fn group(&self, artefacts: &[RawArtefact], filters: &FilterRegistry) -> Result<Grouping> {
        let mut claimed = vec![false; artefacts.len()];
        let mut units = Vec::new();

        for filter in filters.active_filters() {
            match self.form_unit(filter, artefacts, &mut claimed)? {
                Some(unit) => units.push(unit),
                None => debug!("filter {} claimed no artefacts", filter.name()),
            }
        }

        let unclaimed: Vec<RawArtefact> = artefacts
            .iter()
            .zip(&claimed)
            .filter(|(_, claimed)| !**claimed)
            .map(|(artefact, _)| artefact.clone())
            .collect();
        for artefact in &unclaimed {
            warn!("artefact {artefact} matches no active filter and will not be published");
        }

        Ok(Grouping { units, unclaimed })
    }

    fn form_unit(
        &self,
        filter: &PomFilter,
        artefacts: &[RawArtefact],
        claimed: &mut [bool],
    ) -> Result<Option<DeploymentUnit>> {
        let candidates: Vec<usize> = artefacts
            .iter()
            .enumerate()
            .filter(|(index, artefact)| {
                !claimed[*index] && filter.accepts(artefact.descriptor())
            })
            .map(|(index, _)| index)
            .collect();

        let main_index = select_main(artefacts, &candidates);
        let main = main_index.map(|index| &artefacts[index]);
        let attached = collect_attached(filter.name(), artefacts, &candidates, main_index)?;

        if main.is_none() && attached.is_empty() {
            return Ok(None);
        }
        for index in candidates {
            claimed[index] = true;
        }

        let pom = filter
            .template()
            .materialise(main.map(|artefact| artefact.descriptor().extension()));
        let descriptor = RawArtefact::new(
            ArtefactDescriptor::new(DESCRIPTOR_TYPE, DESCRIPTOR_TYPE),
            self.descriptor_path(filter.name()),
        );
        debug!(
            "filter {} formed a deployment with {} attached artefact(s)",
            filter.name(),
            attached.len()
        );

        Ok(Some(DeploymentUnit {
            name: filter.name().to_owned(),
            descriptor,
            pom,
            main: main.cloned(),
            attached,
        }))
    }
}

/// Prefer a packaging artefact; fall back to any classifier-less, non-descriptor one.
fn select_main(artefacts: &[RawArtefact], candidates: &[usize]) -> Option<usize> {
    let descriptor = |index: &&usize| artefacts[**index].descriptor();
    candidates
        .iter()
        .find(|index| descriptor(index).is_main_candidate())
        .or_else(|| {
            candidates.iter().find(|index| {
                let candidate = descriptor(index);
                candidate.classifier().is_none() && !candidate.is_descriptor()
            })
        })
        .copied()
}

fn collect_attached(
    unit: &str,
    artefacts: &[RawArtefact],
    candidates: &[usize],
    main_index: Option<usize>,
) -> Result<Vec<RawArtefact>> {
    let main = main_index.map(|index| &artefacts[index]);
    let mut seen: HashMap<ArtefactKey, &RawArtefact> = HashMap::new();
    if let Some(main) = main {
        seen.insert(main.descriptor().key(), main);
    }

    let mut attached = Vec::new();
    for &index in candidates {
        if Some(index) == main_index {
            continue;
        }
        let artefact = &artefacts[index];
        let descriptor = artefact.descriptor();
        if descriptor.is_descriptor() {
            debug!("descriptor {artefact} is superseded by the generated descriptor for {unit}");
            continue;
        }
        if let Some(existing) = seen.get(&descriptor.key()) {
            return Err(DeployerError::DuplicateArtefact {
                unit: unit.to_owned(),
                existing: existing.to_string(),
                duplicate: artefact.to_string(),
            });
        }
        if let Some(main) = main.filter(|_| descriptor.is_main_candidate()) {
            return Err(DeployerError::MultipleMainArtefacts {
                unit: unit.to_owned(),
                existing: main.to_string(),
                duplicate: artefact.to_string(),
            });
        }
        seen.insert(descriptor.key(), artefact);
        attached.push(artefact.clone());
    }
    Ok(attached)
}

#[cfg(test)]
#[path = "grouping_tests.rs"]
mod tests;
