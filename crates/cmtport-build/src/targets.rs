/// Build target types and the per-package target set
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::ops::{Index, IndexMut};

/// Feature tag of a build target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AtlasLibrary,
    AtlasApplication,
    AtlasComponent,
    AtlasDualUseLibrary,
    AtlasTpcnv,
    AtlasInstallJoboptions,
    AtlasInstallPythonModules,
    AtlasInstallScripts,
    AtlasInstallXmls,
    AtlasInstallData,
    AtlasGenericInstall,
    AtlasUnittest,
    AtlasAthenarunTest,
    AtlasDictionary,
    AtlasInstallTrfs,
    DetcommonInstallHeaders,
    DetcommonGenericInstall,
    TrigconfApplication,
    TdaqLibrary,
    TdaqApplication,
    TdaqInstallData,
    TdaqInstallHeaders,
    TdaqInstallScripts,
}

impl Feature {
    /// Feature name as written in generated build files
    pub fn name(&self) -> &'static str {
        match self {
            Self::AtlasLibrary => "atlas_library",
            Self::AtlasApplication => "atlas_application",
            Self::AtlasComponent => "atlas_component",
            Self::AtlasDualUseLibrary => "atlas_dual_use_library",
            Self::AtlasTpcnv => "atlas_tpcnv",
            Self::AtlasInstallJoboptions => "atlas_install_joboptions",
            Self::AtlasInstallPythonModules => "atlas_install_python_modules",
            Self::AtlasInstallScripts => "atlas_install_scripts",
            Self::AtlasInstallXmls => "atlas_install_xmls",
            Self::AtlasInstallData => "atlas_install_data",
            Self::AtlasGenericInstall => "atlas_generic_install",
            Self::AtlasUnittest => "atlas_unittest",
            Self::AtlasAthenarunTest => "atlas_athenarun_test",
            Self::AtlasDictionary => "atlas_dictionary",
            Self::AtlasInstallTrfs => "atlas_install_trfs",
            Self::DetcommonInstallHeaders => "detcommon_install_headers",
            Self::DetcommonGenericInstall => "detcommon_generic_install",
            Self::TrigconfApplication => "trigconf_application",
            Self::TdaqLibrary => "tdaq_library",
            Self::TdaqApplication => "tdaq_application",
            Self::TdaqInstallData => "tdaq_install_data",
            Self::TdaqInstallHeaders => "tdaq_install_headers",
            Self::TdaqInstallScripts => "tdaq_install_scripts",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kwarg key holding switches split off a source list
pub const SWITCHES_KWARG: &str = "switches";

/// A build target synthesized from a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTarget {
    /// Target name, unique within the package
    pub name: String,
    pub feature: Feature,
    /// Source files or globs, relative to the package directory
    pub sources: Vec<String>,
    /// C++ preprocessor and compiler flags
    pub cxx_flags: Vec<String>,
    /// C compiler flags
    pub c_flags: Vec<String>,
    /// Libraries and packages the target links against
    pub uses: Vec<String>,
    /// Pattern-specific data (selection file, install prefix, ...)
    pub kwargs: BTreeMap<String, Vec<String>>,
}

impl BuildTarget {
    /// Create an empty build target
    pub fn new(name: impl Into<String>, feature: Feature) -> Self {
        Self {
            name: name.into(),
            feature,
            sources: Vec::new(),
            cxx_flags: Vec::new(),
            c_flags: Vec::new(),
            uses: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Set source files
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Set a single-valued keyword argument
    pub fn set_kwarg(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.kwargs.insert(key.into(), vec![value.into()]);
    }

    pub fn kwarg(&self, key: &str) -> Option<&[String]> {
        self.kwargs.get(key).map(Vec::as_slice)
    }
}

/// Stable handle to a target inside a [`TargetSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(usize);

impl TargetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Targets of one package, indexed by name, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    targets: Vec<BuildTarget>,
    by_name: HashMap<String, TargetId>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a target by exact name
    pub fn find(&self, name: &str) -> Option<TargetId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&BuildTarget> {
        self.find(name).map(|id| &self.targets[id.0])
    }

    /// Insert a target; a target with the same name is replaced in place
    pub fn insert(&mut self, target: BuildTarget) -> TargetId {
        if let Some(id) = self.find(&target.name) {
            self.targets[id.0] = target;
            return id;
        }
        let id = TargetId(self.targets.len());
        self.by_name.insert(target.name.clone(), id);
        self.targets.push(target);
        id
    }

    /// Return the named target, creating it with `feature` if absent
    ///
    /// An existing target is re-tagged with `feature`.
    pub fn find_or_create(&mut self, name: &str, feature: Feature) -> &mut BuildTarget {
        let id = match self.find(name) {
            Some(id) => id,
            None => self.insert(BuildTarget::new(name, feature)),
        };
        let target = &mut self.targets[id.0];
        target.feature = feature;
        target
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildTarget> {
        self.targets.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, BuildTarget> {
        self.targets.iter_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Index<TargetId> for TargetSet {
    type Output = BuildTarget;

    fn index(&self, id: TargetId) -> &BuildTarget {
        &self.targets[id.0]
    }
}

impl IndexMut<TargetId> for TargetSet {
    fn index_mut(&mut self, id: TargetId) -> &mut BuildTarget {
        &mut self.targets[id.0]
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a BuildTarget;
    type IntoIter = std::slice::Iter<'a, BuildTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

impl Serialize for TargetSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.targets.serialize(serializer)
    }
}
