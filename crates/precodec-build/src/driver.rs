//! Emission driver: renders model codecs to source units and hands them to
//! a sink.

use crate::{
    config::{BuildConfig, CONFIG_FILE, ConfigError},
    generate,
};
use precodec_schema::{SchemaError, model::ModelDef};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use tracing::{debug, info};

const HEADER: &str = "// @generated by precodec-build. Do not edit.\n";

///
/// ProcessingError
///
/// Generation failure. The cause is carried unchanged; nothing is retried.
///

#[derive(Debug, ThisError)]
pub enum ProcessingError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("environment variable {0} is not set; run from a build script")]
    Env(&'static str),

    #[error("failed to write {unit}: {source}")]
    Io {
        unit: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

///
/// SourceUnit
///
/// One generated file, addressed by namespace and file name.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceUnit {
    pub namespace: String,
    pub file_name: String,
    pub contents: String,
}

impl SourceUnit {
    /// `namespace/segments/file_name`.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        self.namespace
            .split("::")
            .filter(|segment| !segment.is_empty())
            .chain(std::iter::once(self.file_name.as_str()))
            .collect()
    }
}

impl Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path().display())
    }
}

///
/// Sink
///
/// Output collaborator receiving rendered units.
///

pub trait Sink {
    fn write_unit(&mut self, unit: &SourceUnit) -> io::Result<()>;
}

///
/// OutDirSink
///
/// Writes each unit below `root`, creating namespace directories as needed.
///

#[derive(Clone, Debug)]
pub struct OutDirSink {
    root: PathBuf,
}

impl OutDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sink for OutDirSink {
    fn write_unit(&mut self, unit: &SourceUnit) -> io::Result<()> {
        let path = self.root.join(unit.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, &unit.contents)
    }
}

///
/// MemorySink
///

#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    units: Vec<SourceUnit>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    #[must_use]
    pub fn get(&self, namespace: &str, file_name: &str) -> Option<&SourceUnit> {
        self.units
            .iter()
            .find(|unit| unit.namespace == namespace && unit.file_name == file_name)
    }
}

impl Sink for MemorySink {
    fn write_unit(&mut self, unit: &SourceUnit) -> io::Result<()> {
        self.units.push(unit.clone());

        Ok(())
    }
}

///
/// Generator
///

pub struct Generator<S: Sink> {
    sink: S,
    config: BuildConfig,
}

impl<S: Sink> Generator<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, BuildConfig::default())
    }

    pub const fn with_config(sink: S, config: BuildConfig) -> Self {
        Self { sink, config }
    }

    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emit one model's codec as its own unit.
    pub fn emit(&mut self, model: &ModelDef) -> Result<SourceUnit, ProcessingError> {
        debug!(model = %model.identity, "emitting codec");

        let tokens = generate(model)?;
        let unit = SourceUnit {
            namespace: model.identity.namespace().to_string(),
            file_name: self.config.file_name(&model.identity),
            contents: self.render(&tokens.to_string()),
        };
        self.write(&unit)?;

        Ok(unit)
    }

    /// Emit every model in order, then one index unit per namespace.
    /// Stops at the first failure.
    pub fn generate(&mut self, models: &[ModelDef]) -> Result<(), ProcessingError> {
        let mut namespaces: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for model in models {
            let unit = self.emit(model)?;
            namespaces
                .entry(unit.namespace)
                .or_default()
                .push(unit.file_name);
        }

        for (namespace, files) in namespaces {
            let includes = files
                .iter()
                .map(|file| format!("include!({file:?});\n"))
                .collect::<String>();
            let index = SourceUnit {
                namespace,
                file_name: self.config.index_file.clone(),
                contents: self.render(&includes),
            };
            self.write(&index)?;
        }

        Ok(())
    }

    fn render(&self, body: &str) -> String {
        if self.config.header {
            format!("{HEADER}{body}\n")
        } else {
            format!("{body}\n")
        }
    }

    fn write(&mut self, unit: &SourceUnit) -> Result<(), ProcessingError> {
        self.sink
            .write_unit(unit)
            .map_err(|source| ProcessingError::Io {
                unit: unit.to_string(),
                source,
            })?;
        info!(unit = %unit, "wrote source unit");

        Ok(())
    }
}

/// Build-script entry: load `precodec.toml` from the crate root if present
/// and write every model's codec below `OUT_DIR`.
pub fn run(models: &[ModelDef]) -> Result<(), ProcessingError> {
    let out_dir = std::env::var_os("OUT_DIR").ok_or(ProcessingError::Env("OUT_DIR"))?;
    let manifest_dir =
        std::env::var_os("CARGO_MANIFEST_DIR").ok_or(ProcessingError::Env("CARGO_MANIFEST_DIR"))?;
    let config = BuildConfig::load(&Path::new(&manifest_dir).join(CONFIG_FILE))?;

    info!(models = models.len(), out_dir = ?out_dir, "generating codecs");
    Generator::with_config(OutDirSink::new(out_dir), config).generate(models)
}

///
/// TESTS
///
