//! Output document model: YAML front matter plus a markdown body

use pmx_core::{Record, Result, format};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    /// RFC 3339 generation timestamp.
    pub generated: String,
    /// Document-specific keys (section, node, vmid, ...), flattened into
    /// the front matter block.
    #[serde(flatten)]
    pub extra: Record,
}

/// One generated document.
#[derive(Debug, Clone)]
pub struct Document {
    pub front: FrontMatter,
    pub body: String,
}

impl Document {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            front: FrontMatter {
                title: title.into(),
                description: description.into(),
                generated: format::utc_timestamp(),
                extra: Record::new(),
            },
            body: String::new(),
        }
    }

    /// Add a front matter key.
    pub fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.front.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = body;
        self
    }

    /// Serialize to the final file content. When `redacted_rules` is
    /// non-empty a disclosure note is appended so readers know which
    /// categories were anonymized.
    pub fn render(&self, redacted_rules: &[&str]) -> Result<String> {
        let front = serde_yaml::to_string(&self.front)?;
        let mut out = format!("---\n{front}---\n\n{}", self.body);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        if !redacted_rules.is_empty() {
            out.push_str(&format!(
                "\n---\n\n*Redacted for public documentation: {}.*\n",
                redacted_rules.join(", ")
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_is_fenced_yaml() {
        let doc = Document::new("Cluster Overview", "Cluster-wide summary")
            .meta("section", "cluster")
            .with_body("# Cluster\n\nBody text.\n".to_string());
        let rendered = doc.render(&[]).unwrap();

        assert!(rendered.starts_with("---\n"));
        assert!(rendered.contains("title: Cluster Overview"));
        assert!(rendered.contains("section: cluster"));
        assert!(rendered.contains("generated:"));
        assert!(rendered.contains("\n---\n\n# Cluster"));
        assert!(!rendered.contains("Redacted for public documentation"));
    }

    #[test]
    fn disclosure_note_lists_rules() {
        let doc = Document::new("t", "d").with_body("body".to_string());
        let rendered = doc.render(&["MAC addresses", "Email addresses"]).unwrap();
        assert!(
            rendered
                .ends_with("*Redacted for public documentation: MAC addresses, Email addresses.*\n")
        );
    }
}
