use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use yaml_rust2::{Yaml, YamlLoader};

const MAX_INCLUDE_DEPTH: usize = 16;

/// Reads a YAML file and merges every `!include <path>` line into it.
///
/// Included documents are merged first, in order; the including file's own
/// keys override them. Nested mappings are merged key by key, anything else
/// is replaced.
pub fn load_yaml_with_includes(path: &Path) -> Result<Yaml, Box<dyn Error + Send + Sync>> {
    let res = process_includes_recursive(&path.to_path_buf(), 0)?;
    debug!(path = %path.display(), "Processed config includes");
    Ok(res)
}

fn process_includes_recursive(
    path: &PathBuf,
    depth: usize,
) -> Result<Yaml, Box<dyn Error + Send + Sync>> {
    if depth > MAX_INCLUDE_DEPTH {
        return Err(format!("Include depth exceeded at {}", path.display()).into());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let base_path = path.parent().unwrap_or(Path::new(""));

    let (includes, rest): (Vec<&str>, Vec<&str>) = contents
        .lines()
        .partition(|&line| line.trim().starts_with("!include"));

    let mut merged_includes: Option<Yaml> = None;
    for line in includes {
        let include_path = line.trim().trim_start_matches("!include").trim();
        let included = process_includes_recursive(&base_path.join(include_path), depth + 1)?;
        merged_includes = Some(match merged_includes {
            Some(acc) => merge_yaml(&acc, &included),
            None => included,
        });
    }

    let rest_yamls = YamlLoader::load_from_str(&rest.join("\n"))?;
    let merged_rest = rest_yamls
        .into_iter()
        .reduce(|acc: Yaml, doc: Yaml| merge_yaml(&acc, &doc))
        .unwrap_or(Yaml::Null);

    match (merged_includes, merged_rest) {
        (Some(includes), Yaml::Null) => Ok(includes),
        (Some(includes), rest) => Ok(merge_yaml(&includes, &rest)),
        (None, Yaml::Null) => Err(format!("Empty config file {}", path.display()).into()),
        (None, rest) => Ok(rest),
    }
}

fn merge_yaml(base: &Yaml, override_yaml: &Yaml) -> Yaml {
    match (base, override_yaml) {
        (Yaml::Hash(base_hash), Yaml::Hash(override_hash)) => {
            let mut result = base_hash.clone();
            for (key, value) in override_hash {
                let merged = match base_hash.get(key) {
                    Some(base_value) => merge_yaml(base_value, value),
                    None => value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Yaml::Hash(result)
        }
        (_, override_value) => override_value.clone(),
    }
}
