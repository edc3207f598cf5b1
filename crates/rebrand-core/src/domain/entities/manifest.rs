//! Identity-bearing manifest fields.

use serde::Serialize;

use crate::domain::ProjectName;

/// A single project author as written into `[project].authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Optional placeholder fields replaced alongside the project name.
///
/// Each field is only touched when it is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataOverrides {
    pub version: Option<String>,
    pub description: Option<String>,
    pub author: Option<Author>,
    pub documentation_url: Option<String>,
    pub repository_url: Option<String>,
}

impl MetadataOverrides {
    pub fn is_empty(&self) -> bool {
        self.version.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.documentation_url.is_none()
            && self.repository_url.is_none()
    }

    /// Fill in the author from a fallback identity, usually the git
    /// `user.name` / `user.email` pair. Values given explicitly are kept;
    /// blank fallbacks are ignored.
    pub fn with_default_author(mut self, name: Option<String>, email: Option<String>) -> Self {
        let blank = |v: &String| v.trim().is_empty();
        let email = email.filter(|e| !blank(e));
        match &mut self.author {
            Some(author) => {
                if author.email.is_none() {
                    author.email = email;
                }
            }
            None => {
                self.author = name.filter(|n| !blank(n)).map(|name| Author { name, email });
            }
        }
        self
    }

    /// Documentation URL to write: the explicit one, else `<repository>/docs`.
    pub fn effective_documentation_url(&self) -> Option<String> {
        self.documentation_url.clone().or_else(|| {
            self.repository_url
                .as_ref()
                .map(|repo| format!("{}/docs", repo.trim_end_matches('/')))
        })
    }
}

/// Everything the metadata rewriter writes into the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestFields {
    pub name: ProjectName,
    pub overrides: MetadataOverrides,
}

impl ManifestFields {
    pub fn new(name: ProjectName, overrides: MetadataOverrides) -> Self {
        Self { name, overrides }
    }

    /// Field names that a rewrite will touch, for plans and logs.
    pub fn touched_keys(&self) -> Vec<&'static str> {
        let o = &self.overrides;
        let mut keys = vec!["project.name"];
        if o.version.is_some() {
            keys.push("project.version");
        }
        if o.description.is_some() {
            keys.push("project.description");
        }
        if o.author.is_some() {
            keys.push("project.authors");
        }
        if o.effective_documentation_url().is_some() {
            keys.push("project.urls.Documentation");
        }
        if o.repository_url.is_some() {
            keys.push("project.urls.Repository");
        }
        keys
    }
}
