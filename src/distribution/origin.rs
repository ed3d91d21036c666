// ABOUTME: Origin mutator that repoints exactly one origin's path.
// ABOUTME: Produces a new configuration value and never touches the input.

use serde_json::Value;

use crate::types::{OriginId, ProjectName, ReleaseRef};

const ORIGINS_FIELD: &str = "Origins";
const ITEMS_FIELD: &str = "Items";
const ID_FIELD: &str = "Id";
const PATH_FIELD: &str = "OriginPath";

/// Storage path a release is served from: `/<project>/<release tag>`.
pub fn release_origin_path(project: &ProjectName, release: &ReleaseRef) -> String {
    format!("/{}/{}", project, release.tag())
}

/// Result of repointing an origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Repoint {
    /// The origin was found and its path replaced.
    Changed {
        config: Value,
        previous_path: String,
    },
    /// No origin carries the requested id; `config` equals the input.
    NotFound { config: Value },
}

impl Repoint {
    pub fn config(&self) -> &Value {
        match self {
            Repoint::Changed { config, .. } | Repoint::NotFound { config } => config,
        }
    }

    pub fn into_config(self) -> Value {
        match self {
            Repoint::Changed { config, .. } | Repoint::NotFound { config } => config,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Repoint::Changed { .. })
    }
}

/// Return a copy of `config` whose origin `origin_id` points at `new_path`.
///
/// Every other field, including key order inside objects, is carried over
/// untouched: the copy is submitted as the distribution's complete
/// configuration. If several origins share the id, the first one wins.
pub fn repoint(config: &Value, origin_id: &OriginId, new_path: &str) -> Repoint {
    let mut next = config.clone();

    let previous_path = match find_origin_mut(&mut next, origin_id) {
        Some(origin) => {
            let previous = origin
                .get(PATH_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            origin[PATH_FIELD] = Value::String(new_path.to_string());
            Some(previous)
        }
        None => None,
    };

    match previous_path {
        Some(previous_path) => Repoint::Changed {
            config: next,
            previous_path,
        },
        None => Repoint::NotFound { config: next },
    }
}

fn find_origin_mut<'a>(config: &'a mut Value, origin_id: &OriginId) -> Option<&'a mut Value> {
    config
        .get_mut(ORIGINS_FIELD)?
        .get_mut(ITEMS_FIELD)?
        .as_array_mut()?
        .iter_mut()
        .find(|item| item.get(ID_FIELD).and_then(Value::as_str) == Some(origin_id.as_str()))
}
