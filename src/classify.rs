//! Image classification.
//!
//! Derives the operating system, distribution, group and target infra of an
//! image from the merged environment. Everything here is a pure function of
//! the [`Environment`] except the distribution fallback, which asks a
//! [`ReleaseProbe`].

use std::fmt;

use crate::environment::Environment;
use crate::shell;

/// Branch both the templates and the cookbooks must be on for an edge image.
const DEFAULT_EDGE_BRANCH: &str = "master";

/// Marker `git describe --dirty` leaves in a SHA with uncommitted changes.
const DIRTY_MARKER: &str = "dirty";

/// Fallback for anything that cannot be determined.
const UNKNOWN: &str = "unknown";

/// Whether an image was built from canonical branches and clean commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Edge,
    Dev,
}

impl Group {
    /// Lowercase group name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Edge => "edge",
            Group::Dev => "dev",
        }
    }

    /// Name of the boolean tag that flags membership in this group.
    pub fn flag_tag(&self) -> &'static str {
        match self {
            Group::Edge => "group_edge",
            Group::Dev => "group_dev",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment backend an image was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infra {
    Gce,
    Docker,
    JupiterBrain,
    Local,
}

impl Infra {
    /// Map a packer builder type onto an infra.
    pub fn from_builder_type(builder_type: &str) -> Self {
        match builder_type {
            "googlecompute" => Infra::Gce,
            "docker" => Infra::Docker,
            "vmware" => Infra::JupiterBrain,
            _ => Infra::Local,
        }
    }

    /// Name the job board uses for this infra.
    pub fn as_str(&self) -> &'static str {
        match self {
            Infra::Gce => "gce",
            Infra::Docker => "docker",
            Infra::JupiterBrain => "jupiterbrain",
            Infra::Local => "local",
        }
    }
}

impl fmt::Display for Infra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asks the host for its distribution release when `DIST` is not set.
pub trait ReleaseProbe {
    /// Release identifier for `os`, or `None` if it cannot be determined.
    fn release(&self, os: &str) -> Option<String>;
}

/// Probes the local host with `lsb_release` or `sw_vers`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostReleaseProbe;

impl ReleaseProbe for HostReleaseProbe {
    fn release(&self, os: &str) -> Option<String> {
        match os {
            "linux" => shell::capture_stdout("lsb_release", &["-sc"]),
            "osx" => shell::capture_stdout("sw_vers", &["-productVersion"]),
            _ => None,
        }
    }
}

/// The derived identity of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub os: String,
    pub dist: String,
    pub group: Group,
    pub infra: Infra,
}

impl Classification {
    /// Classify the image described by `env`.
    pub fn from_env(env: &Environment, probe: &dyn ReleaseProbe) -> Self {
        let os = os(env);
        let dist = distribution(env, &os, probe);
        Self {
            os,
            dist,
            group: group(env),
            infra: infra(env),
        }
    }
}

/// Operating system: `OS`, else the host platform, else `unknown`.
pub fn os(env: &Environment) -> String {
    let explicit = env.get("OS");
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    host_os().to_string()
}

/// Platform name for the host this binary was built for.
pub fn host_os() -> &'static str {
    if cfg!(target_os = "macos") {
        "osx"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        UNKNOWN
    }
}

/// Distribution: `DIST`, else the probe's answer for `os`, else `unknown`.
pub fn distribution(env: &Environment, os: &str, probe: &dyn ReleaseProbe) -> String {
    let explicit = env.get("DIST");
    if !explicit.is_empty() {
        return explicit.to_string();
    }

    match probe.release(os) {
        Some(release) if !release.trim().is_empty() => release.trim().to_string(),
        _ => {
            tracing::debug!("no release information for os {}", os);
            UNKNOWN.to_string()
        }
    }
}

/// `TRAVIS_COOKBOOKS_EDGE_BRANCH`, defaulting to `master`.
pub fn cookbooks_edge_branch(env: &Environment) -> &str {
    let value = env.get("TRAVIS_COOKBOOKS_EDGE_BRANCH");
    if value.is_empty() {
        DEFAULT_EDGE_BRANCH
    } else {
        value
    }
}

/// `TRAVIS_COOKBOOKS_BRANCH`, defaulting to the edge branch.
pub fn cookbooks_branch(env: &Environment) -> &str {
    let value = env.get("TRAVIS_COOKBOOKS_BRANCH");
    if value.is_empty() {
        cookbooks_edge_branch(env)
    } else {
        value
    }
}

/// `edge` only for canonical branches with clean SHAs, otherwise `dev`.
pub fn group(env: &Environment) -> Group {
    let edge = cookbooks_branch(env) == cookbooks_edge_branch(env)
        && !env.get("TRAVIS_COOKBOOKS_SHA").contains(DIRTY_MARKER)
        && env.get("PACKER_TEMPLATES_BRANCH") == DEFAULT_EDGE_BRANCH
        && !env.get("PACKER_TEMPLATES_SHA").contains(DIRTY_MARKER);

    if edge {
        Group::Edge
    } else {
        Group::Dev
    }
}

/// Infra for `PACKER_BUILDER_TYPE`.
pub fn infra(env: &Environment) -> Infra {
    Infra::from_builder_type(env.get("PACKER_BUILDER_TYPE"))
}
