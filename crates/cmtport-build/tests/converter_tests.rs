//! Pattern converter tests

use cmtport_build::{translate_str, BuildTarget, Feature, PackageGraph, Profile};
use pretty_assertions::assert_eq;
use rstest::rstest;

const PATH: &str = "Event/EventInfo/cmt/requirements";

fn translate(source: &str) -> PackageGraph {
    translate_str(PATH, source, &Profile::atlasoff()).unwrap()
}

fn target<'g>(graph: &'g PackageGraph, name: &str) -> &'g BuildTarget {
    graph
        .targets
        .get(name)
        .unwrap_or_else(|| panic!("no target {name} in {:?}", graph.targets.names()))
}

fn kwarg<'t>(target: &'t BuildTarget, key: &str) -> Option<&'t str> {
    target.kwarg(key).and_then(|v| v.first()).map(String::as_str)
}

#[rstest]
#[case(
    "declare_python_modules files=\"*.py\"",
    "EventInfo-install-py",
    Feature::AtlasInstallPythonModules,
    "python/*.py"
)]
#[case(
    "declare_scripts files=\"a.sh\"",
    "EventInfo-install-scripts",
    Feature::AtlasInstallScripts,
    "scripts/*"
)]
#[case("declare_xmls", "EventInfo-install-xmls", Feature::AtlasInstallXmls, "xml/*")]
#[case("declare_data", "EventInfo-install-data", Feature::AtlasInstallData, "data/*")]
fn test_fixed_install_patterns(
    #[case] pattern: &str,
    #[case] name: &str,
    #[case] feature: Feature,
    #[case] glob: &str,
) {
    let graph = translate(&format!("apply_pattern {pattern}\n"));
    let install = target(&graph, name);
    assert_eq!(install.feature, feature);
    assert_eq!(install.sources, vec![glob]);
}

#[rstest]
#[case("tpcnv_library", "EventInfo")]
#[case("named_tpcnv_library name=EventTPCnv", "EventTPCnv")]
fn test_tpcnv_library(#[case] pattern: &str, #[case] name: &str) {
    let graph = translate(&format!(
        "use AtlasPolicy\nuse EventInfo EventInfo-* Event\napply_pattern {pattern}\n"
    ));
    let lib = target(&graph, name);
    assert_eq!(lib.feature, Feature::AtlasTpcnv);
    assert_eq!(lib.uses, vec!["EventInfo"]);
}

#[test]
fn test_library_without_uses_leaves_list_empty() {
    let graph = translate(
        "use AtlasPolicy AtlasPolicy-*\n\
         apply_pattern named_installed_library library=EvInfo\n",
    );
    assert!(target(&graph, "EvInfo").uses.is_empty());
}

#[test]
fn test_lcgdict() {
    let graph = translate(
        "use AtlasReflex AtlasReflex-* External\n\
         apply_pattern lcgdict dict=EventInfo selectionfile=selection.xml \\\n\
             headerfiles=\"../EventInfo/EventInfoDict.h\"\n",
    );

    let dict = target(&graph, "EventInfoDict");
    assert_eq!(dict.feature, Feature::AtlasDictionary);
    assert_eq!(dict.sources, vec!["EventInfo/EventInfoDict.h"]);
    assert_eq!(kwarg(dict, "selection_file"), Some("EventInfo/selection.xml"));
    assert_eq!(dict.uses, vec!["Reflex"]);
}

#[test]
fn test_unit_test() {
    let graph = translate(
        "use AtlasCppUnit AtlasCppUnit-* External\n\
         apply_pattern UnitTest_run unit_test=EventID extrapatterns=\"^Py:\"\n",
    );

    let test = target(&graph, "EventInfo-test-EventID");
    assert_eq!(test.feature, Feature::AtlasUnittest);
    assert_eq!(test.sources, vec!["test/EventID_test.cxx"]);
    assert_eq!(kwarg(test, "extrapatterns"), Some("^Py:"));
    assert_eq!(test.uses, vec!["CppUnit"]);
}

#[test]
fn test_athenarun_test() {
    let graph = translate(
        "use AtlasROOT AtlasROOT-* External\n\
         apply_pattern athenarun_test name=EventInfoRead \\\n\
             options=EventInfo/read.py post_script=post.sh\n",
    );

    let test = target(&graph, "EventInfo-runtest-EventInfoRead");
    assert_eq!(test.feature, Feature::AtlasAthenarunTest);
    assert_eq!(kwarg(test, "joboptions"), Some("EventInfo/read.py"));
    assert_eq!(kwarg(test, "post_script"), Some("post.sh"));
    assert_eq!(test.uses, vec!["EventInfo"]);
}

#[test]
fn test_generic_install_target_name() {
    let graph = translate(
        "apply_pattern generic_declare_for_link kind=calib files=../share/*.dat \\\n\
             prefix=share/calib name=Calib\n",
    );

    let install = target(&graph, "EventInfo-generic-install-Calib-calib");
    assert_eq!(install.feature, Feature::AtlasGenericInstall);
    assert_eq!(install.sources, vec!["share/*.dat"]);
    assert_eq!(kwarg(install, "install_prefix"), Some("share/calib"));
}

#[test]
fn test_generic_install_without_files() {
    let graph = translate("apply_pattern generic_declare_for_link kind=calib name=Calib\n");

    let install = target(&graph, "EventInfo-generic-install-Calib-calib");
    assert_eq!(install.sources, vec![""]);
    assert!(install.kwarg("install_prefix").is_none());
}

#[test]
fn test_job_transforms() {
    let graph = translate("apply_pattern declare_job_transforms tfs=*_tf.py jo=*.py\n");

    let trfs = target(&graph, "EventInfo-install-trfs");
    assert_eq!(trfs.feature, Feature::AtlasInstallTrfs);
    assert!(trfs.sources.is_empty());
    assert_eq!(kwarg(trfs, "trf_tfs"), Some("*_tf.py"));
    assert_eq!(kwarg(trfs, "trf_jo"), Some("*.py"));
}

// ============================================================================
// DetCommon
// ============================================================================

#[rstest]
#[case("detcommon_shared_library", "EventInfo", "src/*.cxx")]
#[case("detcommon_shared_named_library library=TrigConfBase", "TrigConfBase", "src/*.cxx")]
#[case("detcommon_shared_generic_library files=../src/base/*.cxx", "EventInfo", "src/base/*.cxx")]
fn test_detcommon_shared_library(#[case] pattern: &str, #[case] name: &str, #[case] source: &str) {
    let graph = translate(&format!(
        "use DetCommonPolicy DetCommonPolicy-*\n\
         use AtlasCORAL AtlasCORAL-* External\n\
         apply_pattern {pattern}\n"
    ));

    let lib = target(&graph, name);
    assert_eq!(lib.feature, Feature::AtlasLibrary);
    assert_eq!(lib.sources, vec![source]);
    assert_eq!(lib.uses, vec!["CORAL"]);
}

#[test]
fn test_detcommon_header_installer() {
    let graph = translate("apply_pattern detcommon_header_installer\n");
    let headers = target(&graph, "EventInfo-install-headers");
    assert_eq!(headers.feature, Feature::DetcommonInstallHeaders);
    assert!(headers.sources.is_empty());
}

#[test]
fn test_trigconf_application() {
    let graph = translate(
        "use AtlasBoost AtlasBoost-* External\n\
         apply_pattern trigconf_application name=ConsistencyChecker\n",
    );

    let app = target(&graph, "TrigConfConsistencyChecker");
    assert_eq!(app.feature, Feature::TrigconfApplication);
    assert_eq!(app.sources, vec!["src/test/ConsistencyChecker.cxx"]);
    assert_eq!(app.uses, vec!["EventInfo", "boost-thread", "AtlasBoost"]);
}

#[test]
fn test_trigconf_application_requires_name() {
    let err = translate_str(
        PATH,
        "apply_pattern trigconf_generic_application other=1\n",
        &Profile::atlasoff(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Empty trigconf_generic_application target name"));
}

#[rstest]
#[case("detcommon_link_files")]
#[case("detcommon_copy_files")]
#[case("detcommon_install_docs")]
#[case("detcommon_generic_install")]
fn test_detcommon_generic_install(#[case] pattern: &str) {
    let graph = translate(&format!(
        "apply_pattern {pattern} kind=bin name=tools files=scripts/*.py\n"
    ));

    let install = target(&graph, "EventInfo-generic-install-tools-bin");
    assert_eq!(install.feature, Feature::DetcommonGenericInstall);
    assert_eq!(install.sources, vec!["scripts/*.py"]);
    assert!(install.kwarg("install_prefix").is_none());
}
