//! Galasa project requests.
//!
//! A [`ProjectRequest`] turns the user's choices (package, features, build
//! tools, OBR) into the feature set, slot lists and token values the
//! built-in bundle needs, then plans the whole tree in one pass.
//!
//! # Examples
//!
//! ```
//! use scaffold_cli::project::ProjectRequest;
//! use scaffold_core::{FeatureName, JavaPackageName};
//! use scaffold_templates::bundle::builtin_registry;
//!
//! let request = ProjectRequest::new(
//!     JavaPackageName::new("dev.galasa.example")?,
//!     vec![FeatureName::new("payee")?],
//! )?;
//! let plan = request.plan(&builtin_registry()?, "out")?;
//! assert!(plan.get("out/dev.galasa.example/pom.xml").is_some());
//! # Ok::<(), scaffold_core::Error>(())
//! ```

use scaffold_core::{Error, FeatureName, FeatureSet, JavaPackageName, Result, TokenValues};
use scaffold_files::{MaterializeOptions, Plan, PlanBuilder};
use scaffold_templates::TemplateRegistry;
use scaffold_templates::bundle::{
    DEVELOPMENT_REPOSITORY_URL, FLAG_GRADLE, FLAG_MAVEN, GALASA_VERSION, RELEASE_REPOSITORY_URL,
    slots,
};
use std::path::PathBuf;

/// Feature flag set when an OBR project is requested.
pub const FLAG_OBR: &str = "obr";

/// Version given to every generated module.
const MODULE_VERSION: &str = "0.0.1-SNAPSHOT";

/// Everything needed to generate one Galasa project.
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    /// Parent package, also the parent project's folder name
    pub package: JavaPackageName,
    /// One test project per feature
    pub features: Vec<FeatureName>,
    /// Extra flavour flags such as `zos`
    pub flavors: FeatureSet,
    /// Generate an OBR project
    pub obr: bool,
    /// Generate Maven build files
    pub maven: bool,
    /// Generate Gradle build files
    pub gradle: bool,
    /// Overwrite files that already exist
    pub force: bool,
    /// Point builds at the development repository
    pub development: bool,
}

impl ProjectRequest {
    /// Creates a Maven request with no flavours and no OBR project.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `features` is empty or names a
    /// feature twice.
    pub fn new(package: JavaPackageName, features: Vec<FeatureName>) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one feature is required".to_string(),
            ));
        }
        for (i, feature) in features.iter().enumerate() {
            if features[..i].contains(feature) {
                return Err(Error::InvalidArgument(format!(
                    "feature '{feature}' is listed more than once"
                )));
            }
        }

        Ok(Self {
            package,
            features,
            flavors: FeatureSet::new(),
            obr: false,
            maven: false,
            gradle: false,
            force: false,
            development: false,
        })
    }

    /// Returns `true` if Maven files are generated. Maven is the default
    /// when no build tool was asked for.
    #[must_use]
    pub const fn uses_maven(&self) -> bool {
        self.maven || !self.gradle
    }

    /// Returns `true` if Gradle files are generated.
    #[must_use]
    pub const fn uses_gradle(&self) -> bool {
        self.gradle
    }

    /// Flags used to resolve every slot of the project.
    #[must_use]
    pub fn feature_set(&self) -> FeatureSet {
        let mut set = self.flavors.clone();
        if self.uses_maven() {
            set.insert(FLAG_MAVEN);
        }
        if self.uses_gradle() {
            set.insert(FLAG_GRADLE);
        }
        if self.obr {
            set.insert(FLAG_OBR);
        }
        set
    }

    /// Materialization options implied by the request.
    #[must_use]
    pub const fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions::new().with_overwrite(self.force)
    }

    /// Plans the parent project, one test project per feature and the
    /// optional OBR project under `root`.
    ///
    /// # Errors
    ///
    /// Returns any resolution or planning error; nothing is written.
    pub fn plan(&self, registry: &TemplateRegistry, root: impl Into<PathBuf>) -> Result<Plan> {
        let features = self.feature_set();
        tracing::debug!(package = %self.package, features = %features, "Planning project");

        let parent = registry.resolve_all(self.parent_slots(), &features)?;
        let test = registry.resolve_all(self.test_slots(), &features)?;

        let mut builder = PlanBuilder::new(root).add_units(parent, &self.parent_values());
        for feature in &self.features {
            builder = builder.add_units(test.iter().copied(), &self.test_values(feature));
        }
        if self.obr {
            let obr = registry.resolve_all(self.obr_slots(), &features)?;
            builder = builder.add_units(obr, &self.obr_values());
        }
        builder.build()
    }

    fn parent_slots(&self) -> Vec<&'static str> {
        let mut names = vec![slots::PARENT_DIR];
        if self.uses_maven() {
            names.push(slots::PARENT_POM);
        }
        if self.uses_gradle() {
            names.push(slots::PARENT_SETTINGS_GRADLE);
        }
        names.push(slots::PARENT_GITIGNORE);
        names
    }

    fn test_slots(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.uses_maven() {
            names.push(slots::TEST_POM);
        }
        if self.uses_gradle() {
            names.extend([slots::TEST_BUILD_GRADLE, slots::TEST_BND]);
        }
        names.extend([slots::SAMPLE_TEST, slots::EXTENDED_TEST, slots::SAMPLE_TEXT]);
        names
    }

    fn obr_slots(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.uses_maven() {
            names.push(slots::OBR_POM);
        }
        if self.uses_gradle() {
            names.push(slots::OBR_BUILD_GRADLE);
        }
        names
    }

    const fn repository_url(&self) -> &'static str {
        if self.development {
            DEVELOPMENT_REPOSITORY_URL
        } else {
            RELEASE_REPOSITORY_URL
        }
    }

    fn obr_name(&self) -> String {
        format!("{}.{FLAG_OBR}", self.package)
    }

    /// Names of the child modules, test projects first.
    fn module_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .features
            .iter()
            .map(|f| self.package.child(f).to_string())
            .collect();
        if self.obr {
            names.push(self.obr_name());
        }
        names
    }

    fn parent_values(&self) -> TokenValues {
        let modules = self.module_names();
        TokenValues::new()
            .with("Package", self.package.as_str())
            .with("GalasaVersion", GALASA_VERSION)
            .with("MavenRepositoryUrl", self.repository_url())
            .with("ModulesXml", render_lines(&modules, |m| {
                format!("        <module>{m}</module>")
            }))
            .with("IncludeLines", render_lines(&modules, |m| format!("include '{m}'")))
    }

    fn test_values(&self, feature: &FeatureName) -> TokenValues {
        let package = self.package.child(feature);
        TokenValues::new()
            .with("ParentPackage", self.package.as_str())
            .with("Package", package.as_str())
            .with("PackagePath", package.as_path())
            .with("ClassName", format!("Test{}", feature.class_stem()))
            .with("GalasaVersion", GALASA_VERSION)
            .with("MavenRepositoryUrl", self.repository_url())
    }

    fn obr_values(&self) -> TokenValues {
        let bundles: Vec<String> = self
            .features
            .iter()
            .map(|f| self.package.child(f).to_string())
            .collect();

        let dependencies = render_lines(&bundles, |bundle| {
            [
                "        <dependency>".to_string(),
                format!("            <groupId>{}</groupId>", self.package),
                format!("            <artifactId>{bundle}</artifactId>"),
                format!("            <version>{MODULE_VERSION}</version>"),
                "            <scope>compile</scope>".to_string(),
                "        </dependency>".to_string(),
            ]
            .join("\n")
        });

        TokenValues::new()
            .with("ParentPackage", self.package.as_str())
            .with("Package", self.obr_name())
            .with("MavenRepositoryUrl", self.repository_url())
            .with("ObrDependenciesXml", dependencies)
            .with("ObrBundlesGradle", render_lines(&bundles, |b| {
                format!("    bundle project(':{b}')")
            }))
    }
}

fn render_lines(items: &[String], line: impl Fn(&str) -> String) -> String {
    items
        .iter()
        .map(|item| line(item))
        .collect::<Vec<_>>()
        .join("\n")
}
