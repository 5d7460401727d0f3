//! Built-in templates for Galasa test projects.
//!
//! The bundle lays out a parent project with one test project per feature
//! and an optional OBR project. Build files come in Maven and Gradle
//! flavours, selected by the `maven` and `gradle` flags; the sample test
//! class and the test project's build files have z/OS variants selected by
//! the `zos` flag.
//!
//! All templates take their values from flat tokens. Lists, such as the
//! parent's module list, are rendered by the caller into a single token
//! value before planning.
//!
//! Parent-level tokens: `Package`, `GalasaVersion`, `MavenRepositoryUrl`,
//! `ModulesXml` (Maven) and `IncludeLines` (Gradle).
//!
//! Test-project tokens: `ParentPackage`, `Package`, `PackagePath`,
//! `ClassName`, `GalasaVersion`, `MavenRepositoryUrl`.
//!
//! OBR tokens: `ParentPackage`, `Package`, `MavenRepositoryUrl`,
//! `ObrDependenciesXml` (Maven) and `ObrBundlesGradle` (Gradle).

use crate::registry::TemplateRegistry;
use crate::unit::TemplateUnit;
use scaffold_core::Result;

/// Galasa release the generated build files depend on.
pub const GALASA_VERSION: &str = "0.41.0";

/// Repository used by generated builds for released Galasa artifacts.
pub const RELEASE_REPOSITORY_URL: &str = "https://repo.maven.apache.org/maven2";

/// Repository used by generated builds for development Galasa artifacts.
pub const DEVELOPMENT_REPOSITORY_URL: &str =
    "https://development.galasa.dev/main/maven-repo/obr";

/// Feature flag selecting Maven build files.
pub const FLAG_MAVEN: &str = "maven";
/// Feature flag selecting Gradle build files.
pub const FLAG_GRADLE: &str = "gradle";
/// Feature flag selecting z/OS flavoured test projects.
pub const FLAG_ZOS: &str = "zos";

/// Slot names used by the bundle.
pub mod slots {
    /// Parent project directory.
    pub const PARENT_DIR: &str = "parent-dir";
    /// Parent `pom.xml`.
    pub const PARENT_POM: &str = "parent-pom";
    /// Parent `settings.gradle`.
    pub const PARENT_SETTINGS_GRADLE: &str = "parent-settings-gradle";
    /// Parent `.gitignore`.
    pub const PARENT_GITIGNORE: &str = "parent-gitignore";
    /// Test project `pom.xml`.
    pub const TEST_POM: &str = "test-pom";
    /// Test project `build.gradle`.
    pub const TEST_BUILD_GRADLE: &str = "test-build-gradle";
    /// Test project `bnd.bnd`.
    pub const TEST_BND: &str = "test-bnd";
    /// Sample test class.
    pub const SAMPLE_TEST: &str = "sample-test";
    /// Second sample test class using bundled resources.
    pub const EXTENDED_TEST: &str = "extended-test";
    /// Text resource read by the extended test.
    pub const SAMPLE_TEXT: &str = "sample-text";
    /// OBR project `pom.xml`.
    pub const OBR_POM: &str = "obr-pom";
    /// OBR project `build.gradle`.
    pub const OBR_BUILD_GRADLE: &str = "obr-build-gradle";
}

/// Test and OBR projects are sibling folders inside the parent project.
fn project_path(rest: &str) -> String {
    format!("{{{{ParentPackage}}}}/{{{{Package}}}}/{rest}")
}

/// Every unit in the built-in bundle, in registration order.
#[must_use]
pub fn builtin_units() -> Vec<TemplateUnit> {
    vec![
        TemplateUnit::directory(slots::PARENT_DIR, "{{Package}}"),
        TemplateUnit::file(
            slots::PARENT_POM,
            "{{Package}}/pom.xml",
            include_str!("../templates/parent/pom.xml"),
        )
        .with_selector([FLAG_MAVEN]),
        TemplateUnit::file(
            slots::PARENT_SETTINGS_GRADLE,
            "{{Package}}/settings.gradle",
            include_str!("../templates/parent/settings.gradle"),
        )
        .with_selector([FLAG_GRADLE]),
        TemplateUnit::file(
            slots::PARENT_GITIGNORE,
            "{{Package}}/.gitignore",
            include_str!("../templates/parent/gitignore-maven"),
        ),
        TemplateUnit::file(
            slots::PARENT_GITIGNORE,
            "{{Package}}/.gitignore",
            include_str!("../templates/parent/gitignore-gradle"),
        )
        .with_selector([FLAG_GRADLE]),
        TemplateUnit::file(
            slots::PARENT_GITIGNORE,
            "{{Package}}/.gitignore",
            include_str!("../templates/parent/gitignore-maven-gradle"),
        )
        .with_selector([FLAG_MAVEN, FLAG_GRADLE]),
        TemplateUnit::file(
            slots::TEST_POM,
            project_path("pom.xml"),
            include_str!("../templates/test/pom.xml"),
        )
        .with_selector([FLAG_MAVEN]),
        TemplateUnit::file(
            slots::TEST_POM,
            project_path("pom.xml"),
            include_str!("../templates/test/pom-zos.xml"),
        )
        .with_selector([FLAG_MAVEN, FLAG_ZOS]),
        TemplateUnit::file(
            slots::TEST_BUILD_GRADLE,
            project_path("build.gradle"),
            include_str!("../templates/test/build.gradle"),
        )
        .with_selector([FLAG_GRADLE]),
        TemplateUnit::file(
            slots::TEST_BUILD_GRADLE,
            project_path("build.gradle"),
            include_str!("../templates/test/build-zos.gradle"),
        )
        .with_selector([FLAG_GRADLE, FLAG_ZOS]),
        TemplateUnit::file(
            slots::TEST_BND,
            project_path("bnd.bnd"),
            include_str!("../templates/test/bnd.bnd"),
        )
        .with_selector([FLAG_GRADLE]),
        TemplateUnit::file(
            slots::SAMPLE_TEST,
            project_path("src/main/java/{{PackagePath}}/{{ClassName}}.java"),
            include_str!("../templates/test/SampleTest.java"),
        ),
        TemplateUnit::file(
            slots::SAMPLE_TEST,
            project_path("src/main/java/{{PackagePath}}/{{ClassName}}.java"),
            include_str!("../templates/test/SampleZosTest.java"),
        )
        .with_selector([FLAG_ZOS]),
        TemplateUnit::file(
            slots::EXTENDED_TEST,
            project_path("src/main/java/{{PackagePath}}/{{ClassName}}Extended.java"),
            include_str!("../templates/test/ExtendedTest.java"),
        ),
        TemplateUnit::file(
            slots::SAMPLE_TEXT,
            project_path("src/main/resources/textfiles/sampleText.txt"),
            include_str!("../templates/test/sampleText.txt"),
        ),
        TemplateUnit::file(
            slots::OBR_POM,
            project_path("pom.xml"),
            include_str!("../templates/obr/pom.xml"),
        )
        .with_selector([FLAG_MAVEN]),
        TemplateUnit::file(
            slots::OBR_BUILD_GRADLE,
            project_path("build.gradle"),
            include_str!("../templates/obr/build.gradle"),
        )
        .with_selector([FLAG_GRADLE]),
    ]
}

/// Builds a registry holding the built-in bundle.
///
/// # Errors
///
/// Returns [`scaffold_core::Error::AmbiguousTemplate`] if the bundle's
/// selectors overlap, which the bundle tests rule out.
pub fn builtin_registry() -> Result<TemplateRegistry> {
    TemplateRegistry::builder()
        .register_all(builtin_units())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use scaffold_core::{FeatureSet, TokenValues};

    fn test_values() -> TokenValues {
        TokenValues::new()
            .with("ParentPackage", "my.test.pkg")
            .with("Package", "my.test.pkg.test")
            .with("PackagePath", "my/test/pkg/test")
            .with("ClassName", "TestTest")
            .with("GalasaVersion", GALASA_VERSION)
            .with("MavenRepositoryUrl", RELEASE_REPOSITORY_URL)
    }

    #[test]
    fn test_builtin_registry_builds() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.len(), builtin_units().len());
        assert_eq!(registry.all_slots()[0].as_str(), slots::PARENT_DIR);
    }

    #[test]
    fn test_sample_test_default_and_zos_variants() {
        let registry = builtin_registry().unwrap();

        let plain = registry
            .resolve(slots::SAMPLE_TEST, &FeatureSet::parse("maven"))
            .unwrap();
        assert!(!plain.content_template().contains("IZosImage"));

        let zos = registry
            .resolve(slots::SAMPLE_TEST, &FeatureSet::parse("maven,zos"))
            .unwrap();
        assert!(zos.content_template().contains("IZosImage"));
        assert!(zos.content_template().contains("ITerminal"));
        assert!(zos.content_template().contains("simpleLogonScreenTest"));
    }

    #[test]
    fn test_java_templates_start_with_package_declaration() {
        for unit in builtin_units() {
            if unit.path_template().ends_with(".java") {
                let first = unit
                    .content_template()
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap();
                assert_eq!(first, "package {{.Package}};");
            }
        }
    }

    #[test]
    fn test_java_class_names_match_file_names() {
        let values = test_values();
        for unit in builtin_units() {
            if !unit.path_template().ends_with(".java") {
                continue;
            }
            let path = render(unit.path_template(), &values).unwrap();
            let stem = path.rsplit('/').next().unwrap().trim_end_matches(".java");
            let content = render(unit.content_template(), &values).unwrap();
            assert!(
                content.contains(&format!("public class {stem} ")),
                "{path} does not declare class {stem}"
            );
        }
    }

    #[test]
    fn test_gitignore_follows_build_tools() {
        let registry = builtin_registry().unwrap();
        let content = |list| {
            registry
                .resolve(slots::PARENT_GITIGNORE, &FeatureSet::parse(list))
                .unwrap()
                .content_template()
        };

        assert!(content("maven").contains("target/"));
        assert!(!content("maven").contains(".gradle/"));
        assert!(content("gradle").contains(".gradle/"));
        assert!(!content("gradle").contains("target/"));
        assert!(content("maven,gradle").contains("target/"));
        assert!(content("maven,gradle").contains(".gradle/"));
    }

    #[test]
    fn test_gradle_only_slots_need_gradle() {
        let registry = builtin_registry().unwrap();
        let err = registry
            .resolve(slots::TEST_BND, &FeatureSet::parse("maven"))
            .unwrap_err();
        assert!(err.is_planning_error());
    }

    #[test]
    fn test_test_project_templates_render() {
        let registry = builtin_registry().unwrap();
        let features = FeatureSet::parse("maven,gradle");

        let pom = registry.resolve(slots::TEST_POM, &features).unwrap();
        let rendered = render(pom.content_template(), &test_values()).unwrap();
        assert!(rendered.starts_with("<?xml"));
        assert!(rendered.contains("<groupId>my.test.pkg</groupId>"));
        assert!(rendered.contains("<artifactId>my.test.pkg.test</artifactId>"));

        let bnd = registry.resolve(slots::TEST_BND, &features).unwrap();
        let rendered = render(bnd.content_template(), &test_values()).unwrap();
        assert!(rendered.contains("Bundle-Name: my.test.pkg.test"));

        let java = registry.resolve(slots::SAMPLE_TEST, &features).unwrap();
        let path = render(java.path_template(), &test_values()).unwrap();
        assert_eq!(
            path,
            "my.test.pkg/my.test.pkg.test/src/main/java/my/test/pkg/test/TestTest.java"
        );
    }

    #[test]
    fn test_gradle_dollar_braces_survive_rendering() {
        let registry = builtin_registry().unwrap();
        let bnd = registry
            .resolve(slots::TEST_BND, &FeatureSet::parse("gradle"))
            .unwrap();
        let rendered = render(bnd.content_template(), &test_values()).unwrap();
        assert!(rendered.contains("${tstamp}"));
    }
}
