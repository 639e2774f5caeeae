//! Declaration fixtures for common test scenarios.

use std::path::{Path, PathBuf};

/// An engine-shaped workspace: an abstract base with platform and editor
/// defines, a shared base for game projects, and a few libraries.
pub const ENGINE_WORKSPACE: &str = r#"
[matrix]
platform = ["win64"]
optimization = ["debug", "release"]
mode = ["editor", "game"]
framework = ["vs2019"]

[[project]]
name = "Base"
abstract = true

[[project.rule]]
label = "common"
defines = ["NOMINMAX"]
library-files = ["OptickCore.lib"]
target-path = "[project.RootPath]/Build/[target.Name]"

[[project.rule]]
label = "editor"
when = { mode = ["editor"] }
defines = ["ME_EDITOR"]

[[project.rule]]
label = "platform"
when = { platform = ["win64"] }
defines = ["ME_PLATFORM_WIN64"]

[[project]]
name = "Dementia"
inherits = "Base"
source-root = "Modules/Dementia/Source"

[[project.rule]]
output = "library"
include-paths = ["[project.SourceRootPath]"]

[[project]]
name = "ImGui"
inherits = "Base"
source-root = "Modules/ImGui/Source"

[[project.rule]]
output = "library"
include-paths = ["[project.SourceRootPath]"]

[[project]]
name = "Engine"
inherits = "Base"
source-root = "Engine/Source"

[[project.rule]]
output = "library"
include-paths = ["[project.SourceRootPath]"]

[[project.rule]]
label = "sdl-debug"
when = { optimization = ["debug"] }
library-files = ["SDL2d.lib"]

[[project.rule]]
label = "sdl-release"
when = { optimization = ["release", "retail"] }
library-files = ["SDL2.lib"]

[[project.dependency]]
name = "Dementia"

[[project.dependency]]
name = "ImGui"
visibility = "private"

[[project]]
name = "BaseGame"
inherits = "Base"
abstract = true

[[project.rule]]
output = "library"

[[project.dependency]]
name = "Engine"

[[project]]
name = "Game"
inherits = "BaseGame"
source-root = "Game/Source"

[[project]]
name = "Havana"
inherits = "Base"
source-root = "Havana/Source"

[[project.rule]]
output = "executable"

[[project.dependency]]
name = "Game"

[[solution]]
name = "Editor"
projects = ["Havana"]
"#;

/// Write `content` as `Rigging.toml` under `dir` and return its path.
pub fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("Rigging.toml");
    if let Err(e) = std::fs::write(&path, content) {
        panic!("failed to write fixture {}: {e}", path.display());
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Manifest;
    use crate::core::target::{Mode, Optimization};
    use crate::resolver::{resolve_all, ResolveOptions};
    use crate::test_support::win64;
    use tempfile::TempDir;

    #[test]
    fn test_engine_workspace_resolves() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(tmp.path(), ENGINE_WORKSPACE);
        let manifest = Manifest::load(&path).unwrap();
        let registry = manifest.registry().unwrap();
        let matrix = manifest.target_matrix().unwrap();

        let set = resolve_all(&registry, &matrix, &ResolveOptions::default()).unwrap();
        // Base and BaseGame are abstract.
        assert_eq!(set.projects(), ["Dementia", "Engine", "Game", "Havana", "ImGui"]);

        let havana = set
            .get("Havana", &win64(Optimization::Debug, Mode::Editor))
            .unwrap()
            .config();
        // Havana -> Game -> Engine -> {Dementia public, ImGui private}
        assert!(havana.library_files().contains(&"SDL2d.lib".to_string()));
        assert!(havana
            .include_paths()
            .iter()
            .any(|p| p.ends_with("Modules/Dementia/Source") || p == "Modules/Dementia/Source"));
        assert!(!havana
            .include_paths()
            .iter()
            .any(|p| p.contains("ImGui")));
        assert!(havana.defines().contains("ME_EDITOR"));
    }
}
