//! Run artifact layout under a client directory
//!
//! ```text
//! <client>/client.yaml
//! <client>/guardrails.yaml
//! <client>/sources/**            raw documents
//! <client>/kb/kb_chunks.jsonl    chunk store
//! <client>/runs/<month>/         plan.json, drafts.jsonl, reviewed.jsonl
//! <client>/deliverables/<month>/ posts.csv, reels_scripts.txt, audit_log.json
//! ```

use std::path::{Path, PathBuf};

/// Resolves artifact paths for one client directory.
#[derive(Debug, Clone)]
pub struct ClientPaths {
    root: PathBuf,
}

impl ClientPaths {
    #[must_use]
    pub fn new(client_dir: &Path) -> Self {
        Self {
            root: client_dir.to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Client directory name, used as the client id in the audit log.
    #[must_use]
    pub fn client_id(&self) -> String {
        self.root
            .file_name()
            .map_or_else(|| "client".to_string(), |n| n.to_string_lossy().to_string())
    }

    #[must_use]
    pub fn client_config(&self) -> PathBuf {
        self.root.join("client.yaml")
    }

    #[must_use]
    pub fn guardrails_config(&self) -> PathBuf {
        self.root.join("guardrails.yaml")
    }

    #[must_use]
    pub fn sources_dir(&self) -> PathBuf {
        self.root.join("sources")
    }

    #[must_use]
    pub fn kb_chunks(&self) -> PathBuf {
        self.root.join("kb").join("kb_chunks.jsonl")
    }

    #[must_use]
    pub fn run_dir(&self, month: &str) -> PathBuf {
        self.root.join("runs").join(month)
    }

    #[must_use]
    pub fn plan_file(&self, month: &str) -> PathBuf {
        self.run_dir(month).join("plan.json")
    }

    #[must_use]
    pub fn drafts_file(&self, month: &str) -> PathBuf {
        self.run_dir(month).join("drafts.jsonl")
    }

    #[must_use]
    pub fn reviewed_file(&self, month: &str) -> PathBuf {
        self.run_dir(month).join("reviewed.jsonl")
    }

    #[must_use]
    pub fn deliverables_dir(&self, month: &str) -> PathBuf {
        self.root.join("deliverables").join(month)
    }
}
