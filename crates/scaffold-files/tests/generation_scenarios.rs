//! End-to-end generation scenarios on a real temporary directory.

use scaffold_core::{Error, FeatureSet, TokenValues};
use scaffold_files::{MaterializeOptions, apply_to_disk, plan};
use scaffold_templates::bundle::{builtin_registry, slots};
use scaffold_templates::{TemplateRegistry, TemplateUnit};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Registry with a single sample-test slot whose path is rooted at the
/// package path, holding the built-in default and z/OS bodies.
fn sample_registry() -> TemplateRegistry {
    let builtin = builtin_registry().unwrap();
    let units = builtin.units(slots::SAMPLE_TEST).iter().map(|unit| {
        let flags: Vec<&str> = unit.selector().iter().collect();
        TemplateUnit::file(
            "sample test",
            "{{PackagePath}}/{{ClassName}}.java",
            unit.content_template(),
        )
        .with_selector(flags)
    });
    TemplateRegistry::builder().register_all(units).build().unwrap()
}

fn sample_values() -> TokenValues {
    TokenValues::new()
        .with("Package", "com.acme.tests")
        .with("PackagePath", "com/acme/tests")
        .with("ClassName", "SampleTest")
}

fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

// ============================================================================
// Default flavour
// ============================================================================

#[test]
fn test_default_sample_test_is_generated() {
    let temp = TempDir::new().unwrap();
    let registry = sample_registry();

    let unit = registry.resolve("sample test", &FeatureSet::new()).unwrap();
    let plan = plan(temp.path(), [unit], &sample_values()).unwrap();
    let result = apply_to_disk(&plan, &MaterializeOptions::default());
    assert!(result.is_success());

    assert_eq!(files_under(temp.path()), vec!["com/acme/tests/SampleTest.java"]);
    let content = fs::read_to_string(temp.path().join("com/acme/tests/SampleTest.java")).unwrap();
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap();
    assert_eq!(first, "package com.acme.tests;");
    assert!(content.contains("public class SampleTest"));
    assert!(!content.contains("IZosImage"));
}

// ============================================================================
// z/OS flavour
// ============================================================================

#[test]
fn test_zos_sample_test_is_generated() {
    let temp = TempDir::new().unwrap();
    let registry = sample_registry();

    let unit = registry
        .resolve("sample test", &FeatureSet::parse("zos"))
        .unwrap();
    let plan = plan(temp.path(), [unit], &sample_values()).unwrap();
    assert!(apply_to_disk(&plan, &MaterializeOptions::default()).is_success());

    let content = fs::read_to_string(temp.path().join("com/acme/tests/SampleTest.java")).unwrap();
    assert!(content.contains("import dev.galasa.zos.IZosImage;"));
    assert!(content.contains("import dev.galasa.zos3270.ITerminal;"));
    assert!(content.contains("public void simpleLogonScreenTest()"));
}

// ============================================================================
// Existing files
// ============================================================================

#[test]
fn test_existing_file_is_not_overwritten() {
    let temp = TempDir::new().unwrap();
    let readme = TemplateUnit::file("readme", "com/README", "readme");
    let sample = TemplateUnit::file(
        "sample test",
        "{{PackagePath}}/{{ClassName}}.java",
        "package {{.Package}};",
    );
    let later = TemplateUnit::file("later", "com/acme/tests/Later.java", "later");

    let existing = temp.path().join("com/acme/tests/SampleTest.java");
    fs::create_dir_all(existing.parent().unwrap()).unwrap();
    fs::write(&existing, "hand written").unwrap();

    let plan = plan(temp.path(), [&readme, &sample, &later], &sample_values()).unwrap();
    let result = apply_to_disk(&plan, &MaterializeOptions::default());

    let failure = result.failure.as_ref().unwrap();
    assert_eq!(failure.path, existing);
    assert!(matches!(failure.error, Error::FileExists { .. }));
    assert_eq!(
        failure.error.to_string(),
        format!("File '{}' exists. Use the --force flag to overwrite it.", existing.display())
    );

    // Earlier entries remain, the existing file is untouched, nothing later is written.
    assert!(temp.path().join("com/README").exists());
    assert_eq!(fs::read_to_string(&existing).unwrap(), "hand written");
    assert!(!temp.path().join("com/acme/tests/Later.java").exists());
    assert!(result.created_paths.contains(&temp.path().join("com/README")));
}

#[test]
fn test_force_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let sample = TemplateUnit::file(
        "sample test",
        "{{PackagePath}}/{{ClassName}}.java",
        "package {{.Package}};",
    );
    let existing = temp.path().join("com/acme/tests/SampleTest.java");
    fs::create_dir_all(existing.parent().unwrap()).unwrap();
    fs::write(&existing, "hand written").unwrap();

    let plan = plan(temp.path(), [&sample], &sample_values()).unwrap();
    let options = MaterializeOptions::default().with_overwrite(true);
    assert!(apply_to_disk(&plan, &options).is_success());

    assert_eq!(fs::read_to_string(&existing).unwrap(), "package com.acme.tests;");
}

#[test]
fn test_second_run_over_same_tree_reports_first_file() {
    let temp = TempDir::new().unwrap();
    let unit = TemplateUnit::file("a", "x/a.txt", "a");
    let plan = plan(temp.path(), [&unit], &TokenValues::new()).unwrap();

    assert!(apply_to_disk(&plan, &MaterializeOptions::default()).is_success());
    let second = apply_to_disk(&plan, &MaterializeOptions::default());

    // Directories are reused; the file is refused.
    assert_eq!(second.created_paths.len(), 2);
    assert!(second.failure.unwrap().error.is_conflict());
}

// ============================================================================
// Ambiguous registrations
// ============================================================================

#[test]
fn test_two_zos_sample_tests_are_rejected() {
    let err = TemplateRegistry::builder()
        .register(TemplateUnit::file("sample test", "A.java", "a").with_selector(["zos"]))
        .register(TemplateUnit::file("sample test", "B.java", "b").with_selector(["zos"]))
        .build()
        .unwrap_err();

    assert!(matches!(err, Error::AmbiguousTemplate { ref slot, .. } if slot == "sample test"));
}

// ============================================================================
// Planning failures touch nothing
// ============================================================================

#[test]
fn test_unbound_token_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("out");
    let good = TemplateUnit::file("good", "a.txt", "a");
    let bad = TemplateUnit::file("bad", "b.txt", "{{Missing}}");

    let err = plan(&root, [&good, &bad], &TokenValues::new()).unwrap_err();

    assert!(err.is_unbound_token());
    assert!(!root.exists());
}
