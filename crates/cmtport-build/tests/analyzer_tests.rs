//! Package analysis tests

use cmtport_build::{
    analyze, translate_file, translate_str, ConvertError, Dialect, Feature, PackageGraph, Profile,
    ProfileOverrides, ProfileRegistry,
};
use cmtport_syntax::{parse_str, Statement, Visibility};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

const PATH: &str = "Event/Widgets/cmt/requirements";

fn translate(source: &str) -> PackageGraph {
    translate_str(PATH, source, &Profile::atlasoff()).unwrap()
}

fn directives(graph: &PackageGraph) -> Vec<&'static str> {
    graph.configuration.iter().map(Statement::directive).collect()
}

// ============================================================================
// Declared Targets and Folding
// ============================================================================

#[test]
fn test_linkopts_folded_into_uses() {
    let graph = translate(
        "library Foo src/*.cxx\n\
         macro x 1\n\
         macro_append Foolinkopts \"-lbar\"\n",
    );

    let foo = graph.targets.get("Foo").unwrap();
    assert_eq!(foo.uses, vec!["bar"]);
    assert_eq!(foo.sources, vec!["src/*.cxx"]);
    assert_eq!(foo.feature, Feature::AtlasLibrary);
    assert_eq!(directives(&graph), vec!["macro"]);
    assert_eq!(graph.dialect, Dialect::Declarative);
}

#[test]
fn test_tag_conditioned_macro_not_folded() {
    let graph = translate(
        "library Foo *.cxx\n\
         macro Foolinkopts \"-lbar\" target-opt \"-lbaz\"\n",
    );

    let foo = graph.targets.get("Foo").unwrap();
    assert!(foo.uses.is_empty());
    assert_eq!(directives(&graph), vec!["macro"]);
    assert_eq!(graph.dialect, Dialect::Imperative);
}

#[test]
fn test_compile_flags_and_removal() {
    let graph = translate(
        "application FooApp -s=../bin main.cxx\n\
         macro_remove FooApp_cxxflags -Wall\n\
         macro FooApp_cxxflags \"-Wall -O2\"\n\
         macro_append FooApp_pp_cppflags -DFOO\n\
         macro FooApp_cflags -std=c99\n",
    );

    let app = graph.targets.get("FooApp").unwrap();
    assert_eq!(app.feature, Feature::AtlasApplication);
    assert_eq!(app.sources, vec!["bin/main.cxx"]);
    assert_eq!(app.cxx_flags, vec!["-O2", "-DFOO"]);
    assert_eq!(app.c_flags, vec!["-std=c99"]);
    assert!(graph.configuration.is_empty());
    assert_eq!(graph.dialect, Dialect::Imperative);
}

#[rstest]
#[case("macro_append Foolinkopts -lbar\nmacro_append Foo_cxxflags -O2\n")]
#[case("macro_append Foo_cxxflags -O2\nmacro_append Foolinkopts -lbar\n")]
fn test_folding_independent_of_suffix_interleaving(#[case] macros: &str) {
    let graph = translate(&format!("library Foo\n{macros}"));

    let foo = graph.targets.get("Foo").unwrap();
    assert_eq!(foo.uses, vec!["bar"]);
    assert_eq!(foo.cxx_flags, vec!["-O2"]);
}

#[test]
fn test_shlibflags_fold_after_linkopts() {
    let graph = translate(
        "library Foo\n\
         macro_append Foo_shlibflags -lfirst\n\
         macro_append Foolinkopts -lsecond\n",
    );
    assert_eq!(graph.targets.get("Foo").unwrap().uses, vec!["second", "first"]);
}

#[test]
fn test_boost_fixups() {
    let graph = translate(
        "library Foo\n\
         macro_append Foolinkopts \" -lboost_thread-$(boost_libsuffix) -l$(Bar_lib) \"\n",
    );
    assert_eq!(
        graph.targets.get("Foo").unwrap().uses,
        vec!["boost-thread", "${Bar_lib}"]
    );
}

#[test]
fn test_repeated_library_extends_sources() {
    let graph = translate(
        "library Foo a.cxx\n\
         library Foo -no_prototypes b.cxx\n",
    );

    assert_eq!(graph.targets.len(), 1);
    let foo = graph.targets.get("Foo").unwrap();
    assert_eq!(foo.sources, vec!["src/a.cxx", "src/b.cxx"]);
    assert_eq!(foo.kwarg("switches"), Some(&["-no_prototypes".to_string()][..]));
}

// ============================================================================
// Metadata, Dependencies, Configuration
// ============================================================================

#[test]
fn test_package_metadata() {
    let graph = translate(
        "package Widgets\n\
         author Jane Doe\n\
         author John Roe\n\
         manager Someone Else\n\
         version Widgets-00-01-02\n",
    );

    assert_eq!(graph.package.name, "Widgets");
    assert_eq!(graph.package.path, "Event/Widgets");
    assert_eq!(graph.package.authors, vec!["Jane Doe", "John Roe"]);
    assert_eq!(graph.package.managers, vec!["Someone Else"]);
    assert_eq!(graph.package.version.as_deref(), Some("Widgets-00-01-02"));
    assert!(graph.configuration.is_empty());
}

#[test]
fn test_dependencies_keep_visibility_and_runtime() {
    let graph = translate(
        "use AtlasPolicy AtlasPolicy-*\n\
         private\n\
         use AthenaKernel AthenaKernel-* Control\n\
         use AtlasPyROOT AtlasPyROOT-* External -no_auto_imports\n\
         end_private\n",
    );

    let deps: Vec<(&str, Visibility, bool)> = graph
        .deps
        .iter()
        .map(|d| (d.name.as_str(), d.visibility, d.runtime))
        .collect();
    assert_eq!(
        deps,
        vec![
            ("AtlasPolicy", Visibility::Public, false),
            ("Control/AthenaKernel", Visibility::Private, false),
            ("External/AtlasPyROOT", Visibility::Private, true),
        ]
    );
    assert!(graph.configuration.is_empty());
}

#[test]
fn test_configuration_keeps_source_order() {
    let graph = translate(
        "macro x 1\n\
         set Y 2\n\
         library Foo\n\
         path_append PYTHONPATH $(Widgets_root)/python\n\
         macro_append Foo_cxxflags -O2\n\
         tag target-opt opt\n\
         document doxygen doc *.h\n\
         include_dirs $(Widgets_root)\n",
    );

    assert_eq!(
        directives(&graph),
        vec!["macro", "set", "path_append", "tag", "document", "include_dirs"]
    );
}

// ============================================================================
// Patterns
// ============================================================================

#[test]
fn test_installed_library_creates_target_with_uses() {
    let graph = translate(
        "use AtlasPolicy AtlasPolicy-*\n\
         use AthenaKernel AthenaKernel-* Control\n\
         use AtlasROOT AtlasROOT-* External\n\
         apply_pattern installed_library library=Widgets\n",
    );

    let widgets = graph.targets.get("Widgets").unwrap();
    assert_eq!(widgets.feature, Feature::AtlasLibrary);
    assert_eq!(widgets.uses, vec!["AthenaKernel", "ROOT"]);
}

#[test]
fn test_pattern_sees_only_earlier_uses() {
    let graph = translate(
        "use AthenaKernel AthenaKernel-* Control\n\
         apply_pattern installed_library\n\
         use AtlasROOT AtlasROOT-* External\n",
    );

    assert_eq!(graph.targets.get("Widgets").unwrap().uses, vec!["AthenaKernel"]);
    assert_eq!(graph.deps.len(), 2);
}

#[test]
fn test_pattern_before_any_use_gets_no_uses() {
    let graph = translate(
        "apply_pattern installed_library\n\
         use GaudiInterface GaudiInterface-* External\n",
    );
    assert!(graph.targets.get("Widgets").unwrap().uses.is_empty());
}

#[test]
fn test_pattern_reuses_declared_library() {
    let graph = translate(
        "library Widgets *.cxx\n\
         macro_append Widgetslinkopts -lextra\n\
         apply_pattern component_library\n",
    );

    assert_eq!(graph.targets.len(), 1);
    let widgets = graph.targets.get("Widgets").unwrap();
    assert_eq!(widgets.feature, Feature::AtlasComponent);
    assert_eq!(widgets.sources, vec!["src/*.cxx"]);
    assert_eq!(widgets.uses, vec!["extra"]);
}

#[test]
fn test_joboptions_ignores_arguments() {
    let graph = translate("apply_pattern declare_joboptions files=\"*.py\" stray\n");

    let jobos = graph.targets.get("Widgets-install-jobos").unwrap();
    assert_eq!(jobos.feature, Feature::AtlasInstallJoboptions);
    assert_eq!(jobos.sources, vec!["share/*.py", "share/*.txt"]);
}

#[test]
fn test_unresolved_pattern_is_kept() {
    let graph = translate("apply_pattern declare_runtime files=\"*.dat\"\n");

    assert!(graph.targets.is_empty());
    assert_eq!(graph.pending_patterns.len(), 1);
    assert_eq!(graph.pending_patterns[0].name, "declare_runtime");
    assert!(graph.configuration.is_empty());
}

#[test]
fn test_empty_target_name_is_error() {
    let err = translate_str(
        PATH,
        "apply_pattern named_installed_library other=x\n",
        &Profile::atlasoff(),
    )
    .unwrap_err();

    assert_eq!(err.path(), Some(std::path::Path::new(PATH)));
    match err {
        ConvertError::File { source, .. } => match *source {
            ConvertError::EmptyTargetName { package, args, .. } => {
                assert_eq!(package, "Widgets");
                assert_eq!(args, vec!["other=x"]);
            }
            other => panic!("unexpected error {other:?}"),
        },
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_malformed_argument_is_error() {
    let err = translate_str(PATH, "apply_pattern UnitTest_run unit_test\n", &Profile::atlasoff())
        .unwrap_err();
    assert!(err.to_string().contains("missing '='"));
}

// ============================================================================
// Dialect and Profiles
// ============================================================================

#[rstest]
#[case("path_remove PATH /tmp\n")]
#[case("make_fragment frag\n")]
#[case("pattern p macro <x> 1\n")]
#[case("macro_remove cppflags -Wall\n")]
#[case("macro c_opt \"\" opt -O2\n")]
fn test_imperative_triggers(#[case] source: &str) {
    assert_eq!(translate(source).dialect, Dialect::Imperative);
}

#[test]
fn test_tagged_append_stays_declarative() {
    assert_eq!(translate("macro_append c_opt \"\" opt -O2\n").dialect, Dialect::Declarative);
}

#[test]
fn test_external_prefix_forces_imperative() {
    let graph = translate_str(
        "External/AtlasROOT/cmt/requirements",
        "macro x 1\n",
        &Profile::atlasoff(),
    )
    .unwrap();
    assert_eq!(graph.dialect, Dialect::Imperative);
}

#[test]
fn test_tdaq_profile() {
    let profile = ProfileRegistry::new()
        .select("tdaq", &ProfileOverrides::default())
        .unwrap();
    let graph = translate_str(
        "DAQ/ipc/cmt/requirements",
        "library ipc *.cc\n\
         apply_pattern install_headers\n\
         apply_pattern inst_docs_auto\n",
        &profile,
    )
    .unwrap();

    assert_eq!(graph.targets.get("ipc").unwrap().feature, Feature::TdaqLibrary);
    assert_eq!(
        graph.targets.get("ipc-install-headers").unwrap().feature,
        Feature::TdaqInstallHeaders
    );
    assert_eq!(graph.pending_patterns[0].name, "inst_docs_auto");
}

#[test]
fn test_remap_override_drops_dependency() {
    let mut overrides = ProfileOverrides::default();
    overrides.remap.insert("AthenaKernel".to_string(), Vec::new());
    let profile = ProfileRegistry::new().select("atlasoff", &overrides).unwrap();

    let req = parse_str(
        PATH,
        "use AthenaKernel AthenaKernel-* Control\n\
         use StoreGate StoreGate-* Control\n\
         apply_pattern dual_use_library files=*.cxx\n",
    )
    .unwrap();
    let graph = analyze(&req, &profile).unwrap();

    let widgets = graph.targets.get("Widgets").unwrap();
    assert_eq!(widgets.feature, Feature::AtlasDualUseLibrary);
    assert_eq!(widgets.uses, vec!["StoreGate"]);
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_failing_file_does_not_affect_sibling() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("Good/cmt/requirements");
    let bad = temp_dir.path().join("Bad/cmt/requirements");
    for path in [&good, &bad] {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
    }
    fs::write(&good, "library Good *.cxx\n").unwrap();
    fs::write(&bad, "library Bad *.cxx\nfrobnicate\n").unwrap();

    let profile = Profile::atlasoff();
    let err = translate_file(&bad, &profile).unwrap_err();
    assert_eq!(err.path(), Some(bad.as_path()));
    assert!(err.to_string().contains("frobnicate"));

    let graph = translate_file(&good, &profile).unwrap();
    assert_eq!(graph.package.name, "Good");
}

#[test]
fn test_graph_json() {
    let graph = translate("library Foo *.cxx\n");
    let json: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();

    assert_eq!(json["dialect"], "declarative");
    assert_eq!(json["targets"][0]["name"], "Foo");
    assert_eq!(json["targets"][0]["feature"], "atlas_library");
}
