//! Publishing into a local repository directory.
//!
//! Files are laid out as
//! `<repo>/<group path>/<artifact>/<version>/<artifact>-<version>[-<classifier>].<ext>`,
//! where the group path is the group id with dots replaced by directory
//! separators. The descriptor is installed with the `pom` extension.

use crate::dirs::BaseDirs;
use crate::error::Result as DeployerResult;
use crate::pom::Coordinates;
use crate::settings::{LocalRepositoryLocator, PublishSettings};
use crate::strategy::{PublishRequest, PublishStrategy, StrategyError};
use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io::Read;

/// Lock file serialising installs into one repository.
pub const LOCK_FILE_NAME: &str = ".publican.lock";

/// Extension of checksum sidecar files.
pub const CHECKSUM_EXTENSION: &str = "sha256";

/// Compute the lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> std::io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Directory holding every file of `coordinates` inside `repository`.
#[must_use]
pub fn version_directory(repository: &Utf8Path, coordinates: &Coordinates) -> Utf8PathBuf {
    let mut dir = repository.to_owned();
    for segment in coordinates.group_id.split('.').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir.join(&coordinates.artifact_id).join(&coordinates.version)
}

/// File name of an installed artefact.
#[must_use]
pub fn artefact_file_name(
    coordinates: &Coordinates,
    classifier: Option<&str>,
    extension: &str,
) -> String {
    let Coordinates {
        artifact_id,
        version,
        ..
    } = coordinates;
    match classifier {
        Some(classifier) => format!("{artifact_id}-{version}-{classifier}.{extension}"),
        None => format!("{artifact_id}-{version}.{extension}"),
    }
}

/// [`PublishStrategy`] that copies units into a local repository.
#[derive(Debug, Clone)]
pub struct LocalInstallStrategy {
    repository: Utf8PathBuf,
    checksums: bool,
}

impl LocalInstallStrategy {
    /// Install into `repository` without checksum sidecars.
    #[must_use]
    pub fn new(repository: impl Into<Utf8PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            checksums: false,
        }
    }

    /// Install into the repository named by `settings`, falling back to
    /// `<home>/.m2/repository` from `dirs`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::DeployerError::LocalRepositoryUnavailable`]
    /// when neither the settings nor `dirs` yield a location.
    pub fn from_settings(settings: &PublishSettings, dirs: &dyn BaseDirs) -> DeployerResult<Self> {
        let repository = LocalRepositoryLocator::new(dirs).locate(settings)?;
        debug!("local repository is {repository}");
        Ok(Self::new(repository))
    }

    /// Enable or disable `.sha256` sidecars.
    #[must_use]
    pub const fn with_checksums(mut self, checksums: bool) -> Self {
        self.checksums = checksums;
        self
    }

    /// The repository root.
    #[must_use]
    pub fn repository(&self) -> &Utf8Path {
        &self.repository
    }

    fn install_file(&self, source: &Utf8Path, target: &Utf8Path) -> Result<(), StrategyError> {
        debug!("installing {source} to {target}");
        fs::copy(source, target).map_err(|err| {
            StrategyError::io(format!("failed to copy {source} to {target}"), err)
        })?;
        if self.checksums {
            let digest = compute_sha256(target).map_err(|err| {
                StrategyError::io(format!("failed to hash {target}"), err)
            })?;
            let sidecar = Utf8PathBuf::from(format!("{target}.{CHECKSUM_EXTENSION}"));
            fs::write(&sidecar, digest).map_err(|err| {
                StrategyError::io(format!("failed to write {sidecar}"), err)
            })?;
        }
        Ok(())
    }

    fn install_all(&self, request: &PublishRequest, dir: &Utf8Path) -> Result<(), StrategyError> {
        for (source, target) in planned_installs(request, dir)? {
            self.install_file(source, &target)?;
        }
        Ok(())
    }
}

/// Pair every file of `request` with its target inside `dir`.
///
/// Fails before anything is copied when two files would share a target.
fn planned_installs<'r>(
    request: &'r PublishRequest,
    dir: &Utf8Path,
) -> Result<Vec<(&'r Utf8Path, Utf8PathBuf)>, StrategyError> {
    let coordinates = &request.coordinates;
    let mut plan = vec![(
        request.descriptor_file.as_path(),
        dir.join(artefact_file_name(coordinates, None, "pom")),
    )];
    if let Some((main, extension)) = &request.main_artefact {
        plan.push((
            main.as_path(),
            dir.join(artefact_file_name(coordinates, None, extension)),
        ));
    }
    for attached in &request.attached {
        let name = artefact_file_name(
            coordinates,
            attached.classifier.as_deref(),
            &attached.extension,
        );
        plan.push((attached.file.as_path(), dir.join(name)));
    }

    let mut targets = HashSet::new();
    for (source, target) in &plan {
        if !targets.insert(target.clone()) {
            return Err(StrategyError::new(format!(
                "{source} would overwrite another artefact of {} at {target}",
                request.unit
            )));
        }
    }
    Ok(plan)
}

impl PublishStrategy for LocalInstallStrategy {
    fn publish(&mut self, request: &PublishRequest) -> Result<(), StrategyError> {
        fs::create_dir_all(&self.repository).map_err(|err| {
            StrategyError::io(format!("failed to create {}", self.repository), err)
        })?;
        let lock_path = self.repository.join(LOCK_FILE_NAME);
        let lock = fs::File::create(&lock_path)
            .map_err(|err| StrategyError::io(format!("failed to open {lock_path}"), err))?;
        lock.lock_exclusive()
            .map_err(|err| StrategyError::io(format!("failed to lock {lock_path}"), err))?;

        let dir = version_directory(&self.repository, &request.coordinates);
        let result = fs::create_dir_all(&dir)
            .map_err(|err| StrategyError::io(format!("failed to create {dir}"), err))
            .and_then(|()| self.install_all(request, &dir));

        if let Err(err) = lock.unlock() {
            debug!("failed to release {lock_path}: {err}");
        }
        if result.is_ok() {
            info!("installed {} into {dir}", request.unit);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirs::MockBaseDirs;
    use crate::error::DeployerError;
    use crate::strategy::AttachedFile;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    impl Workspace {
        fn file(&self, name: &str, contents: &str) -> Utf8PathBuf {
            let path = self.root.join("build").join(name);
            fs::create_dir_all(path.parent().expect("parent")).expect("create build dir");
            fs::write(&path, contents).expect("write file");
            path
        }

        fn repository(&self) -> Utf8PathBuf {
            self.root.join("repo")
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
        Workspace { _dir: dir, root }
    }

    fn request(workspace: &Workspace) -> PublishRequest {
        PublishRequest {
            unit: "default".to_owned(),
            coordinates: Coordinates::new("org.example.tools", "app", "1.0"),
            descriptor_file: workspace.file("pom-default.xml", "<project/>"),
            main_artefact: Some((workspace.file("app.jar", "jar bytes"), "jar".to_owned())),
            attached: vec![AttachedFile {
                file: workspace.file("app-sources.jar", "source bytes"),
                artefact_type: "jar".to_owned(),
                extension: "jar".to_owned(),
                classifier: Some("sources".to_owned()),
            }],
        }
    }

    #[rstest]
    fn installs_into_maven_layout(workspace: Workspace) {
        let mut strategy = LocalInstallStrategy::new(workspace.repository());

        strategy.publish(&request(&workspace)).expect("install");

        let dir = workspace.repository().join("org/example/tools/app/1.0");
        assert_eq!(
            fs::read_to_string(dir.join("app-1.0.pom")).expect("pom"),
            "<project/>"
        );
        assert_eq!(
            fs::read_to_string(dir.join("app-1.0.jar")).expect("jar"),
            "jar bytes"
        );
        assert_eq!(
            fs::read_to_string(dir.join("app-1.0-sources.jar")).expect("sources"),
            "source bytes"
        );
        assert!(!dir.join("app-1.0.jar.sha256").exists());
    }

    #[rstest]
    fn from_settings_installs_below_the_home_directory(workspace: Workspace) {
        let home = workspace.root.join("home");
        let mut dirs = MockBaseDirs::new();
        dirs.expect_home_dir().return_const(Some(home.clone()));
        let mut strategy = LocalInstallStrategy::from_settings(&PublishSettings::default(), &dirs)
            .expect("home repository");

        strategy.publish(&request(&workspace)).expect("install");

        assert_eq!(strategy.repository(), home.join(".m2/repository"));
        assert!(
            home.join(".m2/repository/org/example/tools/app/1.0/app-1.0.jar")
                .exists()
        );
    }

    #[rstest]
    fn from_settings_prefers_the_configured_repository(workspace: Workspace) {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_home_dir().never();
        let settings = PublishSettings {
            local_repository: Some(workspace.repository()),
            offline: true,
        };

        let strategy = LocalInstallStrategy::from_settings(&settings, &dirs).expect("repository");

        assert_eq!(strategy.repository(), workspace.repository());
    }

    #[test]
    fn from_settings_fails_without_any_location() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_home_dir().return_const(None::<Utf8PathBuf>);

        let err = LocalInstallStrategy::from_settings(&PublishSettings::default(), &dirs)
            .expect_err("no location");

        assert!(matches!(err, DeployerError::LocalRepositoryUnavailable { .. }));
    }

    #[rstest]
    fn writes_checksum_sidecars_when_enabled(workspace: Workspace) {
        let mut strategy = LocalInstallStrategy::new(workspace.repository()).with_checksums(true);

        strategy.publish(&request(&workspace)).expect("install");

        let jar = workspace.repository().join("org/example/tools/app/1.0/app-1.0.jar");
        let sidecar = fs::read_to_string(format!("{jar}.sha256")).expect("sidecar");
        assert_eq!(sidecar, compute_sha256(&jar).expect("digest"));
        assert_eq!(sidecar.len(), 64);
    }

    #[rstest]
    fn descriptor_only_unit_installs_just_the_pom(workspace: Workspace) {
        let mut request = request(&workspace);
        request.main_artefact = None;
        request.attached.clear();
        let mut strategy = LocalInstallStrategy::new(workspace.repository());

        strategy.publish(&request).expect("install");

        let dir = workspace.repository().join("org/example/tools/app/1.0");
        let entries: Vec<_> = fs::read_dir(&dir)
            .expect("read dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, ["app-1.0.pom"]);
    }

    #[rstest]
    fn missing_source_file_fails(workspace: Workspace) {
        let mut request = request(&workspace);
        request.main_artefact = Some((workspace.root.join("absent.jar"), "jar".to_owned()));
        let mut strategy = LocalInstallStrategy::new(workspace.repository());

        let err = strategy.publish(&request).expect_err("copy fails");

        assert!(err.message().contains("absent.jar"));
    }

    #[rstest]
    #[case::unclassified_main_clash("bundle", "jar", None, "app-1.0.jar")]
    #[case::classified_clash("java-source", "jar", Some("sources"), "app-1.0-sources.jar")]
    #[case::descriptor_clash("pom-extra", "pom", None, "app-1.0.pom")]
    fn clashing_targets_fail_without_overwriting(
        workspace: Workspace,
        #[case] artefact_type: &str,
        #[case] extension: &str,
        #[case] classifier: Option<&str>,
        #[case] target: &str,
    ) {
        let mut request = request(&workspace);
        request.attached.push(AttachedFile {
            file: workspace.file("clash.bin", "CLASH"),
            artefact_type: artefact_type.to_owned(),
            extension: extension.to_owned(),
            classifier: classifier.map(str::to_owned),
        });
        let mut strategy = LocalInstallStrategy::new(workspace.repository());

        let err = strategy.publish(&request).expect_err("targets clash");

        assert!(err.message().contains(target), "{}", err.message());
        let dir = workspace.repository().join("org/example/tools/app/1.0");
        assert!(!dir.join("app-1.0.jar").exists());
        assert!(!dir.join("app-1.0-sources.jar").exists());
    }

    #[test]
    fn sha256_of_known_content() {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("hello.txt")).expect("utf-8 path");
        fs::write(&path, "hello").expect("write");
        assert_eq!(
            compute_sha256(&path).expect("digest"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[rstest]
    #[case::plain(None, "jar", "app-1.0.jar")]
    #[case::classified(Some("javadoc"), "jar", "app-1.0-javadoc.jar")]
    #[case::descriptor(None, "pom", "app-1.0.pom")]
    fn file_names(#[case] classifier: Option<&str>, #[case] extension: &str, #[case] expected: &str) {
        let coordinates = Coordinates::new("org.example", "app", "1.0");
        assert_eq!(artefact_file_name(&coordinates, classifier, extension), expected);
    }
}
