//! Loading of compiled contract artifacts produced by an external build
//! system (hardhat or foundry).

use {
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    anyhow::{Context, Result, anyhow, ensure},
    serde::Deserialize,
    std::{
        fmt::{self, Display, Formatter},
        fs,
        path::{Path, PathBuf},
    },
};

/// Identifies which compiled contract to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRef {
    /// Contract name looked up in an artifacts directory.
    Name(String),
    /// Explicit path to an artifact JSON file.
    Path(PathBuf),
}

impl ArtifactRef {
    pub fn parse(value: &str) -> Self {
        let is_path = value.ends_with(".json") || value.contains(['/', '\\']);
        if is_path {
            Self::Path(value.into())
        } else {
            Self::Name(value.to_string())
        }
    }

    /// The contract name the reference points at. For paths this is the file
    /// stem.
    pub fn contract_name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Path(path) => path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default(),
        }
    }

    /// Operator facing label for the deployed address, e.g. `ServiceManager`
    /// becomes `service manager`.
    pub fn label(&self) -> String {
        let mut label = String::new();
        let mut prev: Option<char> = None;
        let mut chars = self.contract_name().chars().peekable();
        while let Some(c) = chars.next() {
            if c == '_' || c == '-' {
                if !label.is_empty() && !label.ends_with(' ') {
                    label.push(' ');
                }
                prev = None;
                continue;
            }
            let boundary = c.is_uppercase()
                && prev.is_some_and(|p| {
                    p.is_lowercase()
                        || p.is_ascii_digit()
                        || (p.is_uppercase() && chars.peek().is_some_and(|n| n.is_lowercase()))
                });
            if boundary {
                label.push(' ');
            }
            label.extend(c.to_lowercase());
            prev = Some(c);
        }
        label
    }
}

impl Display for ArtifactRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A compiled contract ready to be deployed.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
    pub bytecode: Bytes,
    pub abi: JsonAbi,
}

/// The subset of a build artifact we care about. Hardhat stores the creation
/// code as a plain hex string while foundry nests it in an object.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    #[serde(default)]
    abi: JsonAbi,
    bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hardhat(String),
    Foundry { object: String },
}

impl RawBytecode {
    fn into_hex(self) -> String {
        match self {
            Self::Hardhat(hex) | Self::Foundry { object: hex } => hex,
        }
    }
}

impl Artifact {
    /// Resolves an artifact reference against the artifacts directory and
    /// loads it.
    pub fn resolve(artifact: &ArtifactRef, artifacts_dir: &Path) -> Result<Self> {
        let path = match artifact {
            ArtifactRef::Path(path) => path.clone(),
            ArtifactRef::Name(name) => find(artifacts_dir, name)?,
        };
        Self::load(&path)
    }

    /// Loads and validates the artifact stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("could not read artifact {}", path.display()))?;
        Self::from_json(path, &json)
    }

    fn from_json(path: &Path, json: &str) -> Result<Self> {
        let raw: RawArtifact = serde_json::from_str(json)
            .with_context(|| format!("malformed artifact {}", path.display()))?;
        let name = match raw.contract_name {
            Some(name) => name,
            None => path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .context("artifact path has no file name")?
                .to_string(),
        };

        let hex = raw.bytecode.into_hex();
        let bytecode: Bytes = hex.parse().with_context(|| {
            if hex.contains("__") {
                format!("{name} bytecode contains unlinked library placeholders")
            } else {
                format!("{name} bytecode is not valid hex")
            }
        })?;
        ensure!(
            !bytecode.is_empty(),
            "{name} has no creation code, it is probably abstract or an interface"
        );
        if let Some(constructor) = &raw.abi.constructor {
            ensure!(
                constructor.inputs.is_empty(),
                "{name} constructor expects {} argument(s) but none are supplied",
                constructor.inputs.len()
            );
        }

        Ok(Self {
            name,
            path: path.to_path_buf(),
            bytecode,
            abi: raw.abi,
        })
    }
}

/// Recursively searches `dir` for `<name>.json`, skipping hardhat's debug
/// files. Exactly one match is required.
fn find(dir: &Path, name: &str) -> Result<PathBuf> {
    let file_name = format!("{name}.json");
    let mut matches = Vec::new();
    collect(dir, &file_name, &mut matches)
        .with_context(|| format!("could not search artifacts directory {}", dir.display()))?;
    match matches.len() {
        0 => Err(anyhow!(
            "no artifact named {file_name} in {}",
            dir.display()
        )),
        1 => Ok(matches.remove(0)),
        _ => {
            matches.sort();
            let candidates = matches
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(anyhow!("ambiguous artifact name {name}: {candidates}"))
        }
    }
}

fn collect(dir: &Path, file_name: &str, matches: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect(&path, file_name, matches)?;
        } else if entry.file_name() == file_name {
            matches.push(path);
        }
    }
    Ok(())
}
