use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

pub(crate) const CHAT_TEMPLATE: &str = r#"{
  "id": "t_{{timestamp}}",
  "persona": "Brand Strategist",
  "conversation": [
    {"role": "system", "content": "You are a creative branding expert."},
    {"role": "user", "content": "{{prompt}}"}
  ],
  "metadata": {"category": "branding", "difficulty": "medium", "tags": ["brand"]}
}"#;

/// A temp workspace holding a template and a prompt file.
pub(crate) struct Workspace {
    pub(crate) dir: TempDir,
    pub(crate) template: PathBuf,
    pub(crate) prompts: PathBuf,
}

impl Workspace {
    pub(crate) fn prefix(&self, name: &str) -> PathBuf {
        self.dir.path().join("out").join(name)
    }

    /// Names of every entry in the workspace's `out` directory, sorted.
    pub(crate) fn output_entries(&self) -> Vec<String> {
        let out = self.dir.path().join("out");
        if !out.exists() {
            return Vec::new();
        }
        let mut names: Vec<String> = std::fs::read_dir(out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

pub(crate) fn create_workspace(template: &str, prompts: &str) -> Workspace {
    let dir = TempDir::new().unwrap();
    let template_path = dir.path().join("template.json");
    let prompts_path = dir.path().join("prompts.txt");
    std::fs::write(&template_path, template).unwrap();
    std::fs::write(&prompts_path, prompts).unwrap();

    Workspace {
        dir,
        template: template_path,
        prompts: prompts_path,
    }
}
