//! Registration tag set construction.

use std::fmt;

use crate::classify::{self, Classification, Group};
use crate::environment::Environment;

/// Ordered tag mapping.
///
/// Inserting an existing name replaces its value in place; new names are
/// appended.
///
/// # Example
///
/// ```
/// use job_board_register::tags::TagSet;
///
/// let mut tags = TagSet::new();
/// tags.insert("os", "linux");
/// tags.insert("dist", "trusty");
/// tags.insert("os", "osx");
///
/// assert_eq!(tags.to_string(), "os:osx,dist:trusty");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: Vec<(String, String)>,
}

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Value of a tag.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tag names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Apply comma-separated `name:value` overrides.
    ///
    /// Each pair is split on its first `:`. Pairs with an empty or missing
    /// value are ignored.
    pub fn apply_overrides(&mut self, overrides: &str) {
        for pair in overrides.split(',') {
            match pair.split_once(':') {
                Some((name, value)) if !value.is_empty() => self.insert(name, value),
                _ => tracing::debug!("ignoring tag override {:?}", pair),
            }
        }
    }
}

/// `name:value` pairs joined by commas, in insertion order.
impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", name, value)?;
        }
        Ok(())
    }
}

/// The tags every registration carries, before overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTags {
    pub os: String,
    pub group: Group,
    pub dist: String,
    pub packer_templates_branch: String,
    pub packer_templates_sha: String,
    pub travis_cookbooks_branch: String,
    pub travis_cookbooks_sha: String,
    /// Present only when `PACKER_BUILD_NAME` is set.
    pub packer_build_name: Option<String>,
    /// Present only when `PACKER_BUILDER_TYPE` is set.
    pub packer_builder_type: Option<String>,
}

impl ImageTags {
    /// Collect the base tags from the environment and its classification.
    pub fn new(env: &Environment, classification: &Classification) -> Self {
        let optional = |key: &str| env.contains(key).then(|| env.get(key).to_string());

        Self {
            os: classification.os.clone(),
            group: classification.group,
            dist: classification.dist.clone(),
            packer_templates_branch: env.get("PACKER_TEMPLATES_BRANCH").to_string(),
            packer_templates_sha: env.get("PACKER_TEMPLATES_SHA").to_string(),
            travis_cookbooks_branch: classify::cookbooks_branch(env).to_string(),
            travis_cookbooks_sha: env.get("TRAVIS_COOKBOOKS_SHA").to_string(),
            packer_build_name: optional("PACKER_BUILD_NAME"),
            packer_builder_type: optional("PACKER_BUILDER_TYPE"),
        }
    }

    /// Lay the base tags out in registration order.
    pub fn into_tag_set(self) -> TagSet {
        let mut tags = TagSet::new();
        tags.insert("os", self.os);
        tags.insert(self.group.flag_tag(), "true");
        tags.insert("group", self.group.as_str());
        tags.insert("dist", self.dist);
        tags.insert("packer_templates_branch", self.packer_templates_branch);
        tags.insert("packer_templates_sha", self.packer_templates_sha);
        tags.insert("travis_cookbooks_branch", self.travis_cookbooks_branch);
        tags.insert("travis_cookbooks_sha", self.travis_cookbooks_sha);
        if let Some(name) = self.packer_build_name {
            tags.insert("packer_build_name", name);
        }
        if let Some(builder_type) = self.packer_builder_type {
            tags.insert("packer_builder_type", builder_type);
        }
        tags
    }
}

/// Build the full tag set: base tags, then `TAGS` overrides if present.
pub fn build_tags(env: &Environment, classification: &Classification) -> TagSet {
    let mut tags = ImageTags::new(env, classification).into_tag_set();
    if env.contains("TAGS") {
        tags.apply_overrides(env.get("TAGS"));
    }
    tags
}
